//! Polygonal surfaces in space.

use crate::error::{ModelError, Result, check_indices};
use crate::geometry::Point3;

/// Surface polygon tagged with a boundary type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SurfaceFace {
    pub vertices: Vec<usize>,
    pub btype: i32,
}

impl SurfaceFace {
    pub fn new(vertices: Vec<usize>, btype: i32) -> Self {
        Self { vertices, btype }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Surface3D {
    pub points: Vec<Point3>,
    pub faces: Vec<SurfaceFace>,
}

impl Surface3D {
    pub fn new(points: Vec<Point3>, faces: Vec<SurfaceFace>) -> Self {
        Self { points, faces }
    }

    pub fn n_points(&self) -> usize {
        self.points.len()
    }

    pub fn n_faces(&self) -> usize {
        self.faces.len()
    }

    pub fn validate(&self) -> Result<()> {
        for (index, face) in self.faces.iter().enumerate() {
            if face.vertices.len() < 3 {
                return Err(ModelError::DegenerateElement {
                    kind: "surface face",
                    index,
                    vertices: face.vertices.len(),
                });
            }
            check_indices("surface point", face.vertices.iter().copied(), self.points.len())?;
        }
        Ok(())
    }
}
