//! Face-based volumetric grids.

use std::collections::HashMap;

use crate::error::{ModelError, Result, check_indices};
use crate::geometry::Point3;
use crate::surface::{Surface3D, SurfaceFace};

/// Polygonal face between (at most) two cells.
///
/// The face normal, by the right-hand rule over `vertices`, points from
/// `left` towards `right`. Boundary faces have exactly one adjacent cell.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GridFace {
    pub vertices: Vec<usize>,
    pub left: Option<usize>,
    pub right: Option<usize>,
    pub btype: i32,
}

impl GridFace {
    pub fn new(
        vertices: Vec<usize>,
        left: Option<usize>,
        right: Option<usize>,
        btype: i32,
    ) -> Self {
        Self {
            vertices,
            left,
            right,
            btype,
        }
    }

    pub fn is_boundary(&self) -> bool {
        self.left.is_none() || self.right.is_none()
    }
}

/// Volumetric grid described by its faces.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Grid3D {
    pub points: Vec<Point3>,
    pub faces: Vec<GridFace>,
    pub n_cells: usize,
}

impl Grid3D {
    pub fn new(points: Vec<Point3>, faces: Vec<GridFace>, n_cells: usize) -> Self {
        Self {
            points,
            faces,
            n_cells,
        }
    }

    pub fn n_points(&self) -> usize {
        self.points.len()
    }

    pub fn n_faces(&self) -> usize {
        self.faces.len()
    }

    pub fn n_cells(&self) -> usize {
        self.n_cells
    }

    pub fn boundary_faces(&self) -> impl Iterator<Item = (usize, &GridFace)> + '_ {
        self.faces.iter().enumerate().filter(|(_, f)| f.is_boundary())
    }

    /// Face indices bounding every cell.
    pub fn cell_faces(&self) -> Vec<Vec<usize>> {
        let mut cells = vec![Vec::new(); self.n_cells];
        for (index, face) in self.faces.iter().enumerate() {
            for cell in [face.left, face.right].into_iter().flatten() {
                if let Some(own) = cells.get_mut(cell) {
                    own.push(index);
                }
            }
        }
        cells
    }

    /// Distinct vertices of every cell, in order of first appearance.
    pub fn cell_vertices(&self) -> Vec<Vec<usize>> {
        self.cell_faces()
            .into_iter()
            .map(|faces| {
                let mut vertices: Vec<usize> = Vec::new();
                for face in faces {
                    for &v in &self.faces[face].vertices {
                        if !vertices.contains(&v) {
                            vertices.push(v);
                        }
                    }
                }
                vertices
            })
            .collect()
    }

    /// Boundary surface with outward-facing normals.
    pub fn surface(&self) -> Surface3D {
        let mut renumber: HashMap<usize, usize> = HashMap::new();
        let mut points = Vec::new();
        let mut faces = Vec::new();
        for (_, face) in self.boundary_faces() {
            let mut vertices: Vec<usize> = face
                .vertices
                .iter()
                .map(|&v| {
                    *renumber.entry(v).or_insert_with(|| {
                        points.push(self.points[v]);
                        points.len() - 1
                    })
                })
                .collect();
            if face.left.is_none() {
                vertices.reverse();
            }
            faces.push(SurfaceFace::new(vertices, face.btype));
        }
        Surface3D::new(points, faces)
    }

    /// Check face connectivity and adjacency.
    pub fn validate(&self) -> Result<()> {
        let n = self.points.len();
        for (index, face) in self.faces.iter().enumerate() {
            if face.vertices.len() < 3 {
                return Err(ModelError::DegenerateElement {
                    kind: "face",
                    index,
                    vertices: face.vertices.len(),
                });
            }
            check_indices("grid point", face.vertices.iter().copied(), n)?;
            if face.left.is_none() && face.right.is_none() {
                return Err(ModelError::UnattachedFace { index });
            }
            check_indices("cell", [face.left, face.right].into_iter().flatten(), self.n_cells)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Single tetrahedron with outward-oriented boundary faces.
    fn tetrahedron() -> Grid3D {
        Grid3D::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(0.0, 0.0, 1.0),
            ],
            vec![
                GridFace::new(vec![0, 2, 1], Some(0), None, 1),
                GridFace::new(vec![0, 1, 3], Some(0), None, 2),
                GridFace::new(vec![0, 3, 2], Some(0), None, 2),
                GridFace::new(vec![1, 2, 3], Some(0), None, 3),
            ],
            1,
        )
    }

    #[test]
    fn test_tetrahedron_connectivity() {
        let g = tetrahedron();
        assert!(g.validate().is_ok());
        assert_eq!(g.cell_faces(), vec![vec![0, 1, 2, 3]]);
        assert_eq!(g.cell_vertices(), vec![vec![0, 2, 1, 3]]);
    }

    #[test]
    fn test_surface_of_tetrahedron() {
        let s = tetrahedron().surface();
        assert_eq!(s.n_points(), 4);
        assert_eq!(s.n_faces(), 4);
        assert_eq!(s.faces[3].btype, 3);
    }

    #[test]
    fn test_validate_rejects_unattached_face() {
        let mut g = tetrahedron();
        g.faces[1].left = None;
        assert_eq!(g.validate(), Err(ModelError::UnattachedFace { index: 1 }));
    }
}
