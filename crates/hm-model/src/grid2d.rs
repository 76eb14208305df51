//! Planar grids.

use std::collections::{BTreeMap, HashMap};

use crate::contour::{Contour2D, ContourEdge};
use crate::error::{ModelError, Result, check_indices};
use crate::geometry::{Point2, merge_points};

/// Grid edge derived from cell connectivity.
///
/// `left` is the cell that traverses the edge from `vertices[0]` to
/// `vertices[1]`; `right` is the opposite cell, absent on the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridEdge {
    pub vertices: [usize; 2],
    pub left: Option<usize>,
    pub right: Option<usize>,
}

impl GridEdge {
    pub fn is_boundary(&self) -> bool {
        self.left.is_none() || self.right.is_none()
    }
}

/// Planar grid of polygonal cells.
///
/// Cells are vertex loops into `points`. Boundary types are attached to
/// undirected edges; edges without an explicit type have type `0`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Grid2D {
    pub points: Vec<Point2>,
    pub cells: Vec<Vec<usize>>,
    boundary_types: BTreeMap<(usize, usize), i32>,
}

fn edge_key(a: usize, b: usize) -> (usize, usize) {
    if a < b { (a, b) } else { (b, a) }
}

impl Grid2D {
    pub fn new(points: Vec<Point2>, cells: Vec<Vec<usize>>) -> Self {
        Self {
            points,
            cells,
            boundary_types: BTreeMap::new(),
        }
    }

    /// Rectangular grid of `nx` x `ny` quadrilaterals covering
    /// `[x0, x0 + width] x [y0, y0 + height]`.
    pub fn rectangle(x0: f64, y0: f64, width: f64, height: f64, nx: usize, ny: usize) -> Self {
        let mut points = Vec::with_capacity((nx + 1) * (ny + 1));
        for j in 0..=ny {
            for i in 0..=nx {
                points.push(Point2::new(
                    x0 + width * i as f64 / nx as f64,
                    y0 + height * j as f64 / ny as f64,
                ));
            }
        }
        let mut cells = Vec::with_capacity(nx * ny);
        for j in 0..ny {
            for i in 0..nx {
                let p = j * (nx + 1) + i;
                cells.push(vec![p, p + 1, p + nx + 2, p + nx + 1]);
            }
        }
        Self::new(points, cells)
    }

    pub fn n_points(&self) -> usize {
        self.points.len()
    }

    pub fn n_cells(&self) -> usize {
        self.cells.len()
    }

    /// Boundary type of the edge `a`-`b` (either direction).
    pub fn boundary_type(&self, a: usize, b: usize) -> i32 {
        self.boundary_types
            .get(&edge_key(a, b))
            .copied()
            .unwrap_or(0)
    }

    pub fn set_boundary_type(&mut self, a: usize, b: usize, btype: i32) {
        if btype == 0 {
            self.boundary_types.remove(&edge_key(a, b));
        } else {
            self.boundary_types.insert(edge_key(a, b), btype);
        }
    }

    /// Edges carrying a non-default boundary type.
    pub fn typed_edges(&self) -> impl Iterator<Item = ((usize, usize), i32)> + '_ {
        self.boundary_types.iter().map(|(&k, &v)| (k, v))
    }

    /// Edge list plus, for every cell, the indices of its edges.
    ///
    /// Edges are numbered in order of first appearance while walking cells.
    pub fn edge_table(&self) -> (Vec<GridEdge>, Vec<Vec<usize>>) {
        let mut index: HashMap<(usize, usize), usize> = HashMap::new();
        let mut edges: Vec<GridEdge> = Vec::new();
        let mut cell_edges = Vec::with_capacity(self.cells.len());

        for (cell_index, cell) in self.cells.iter().enumerate() {
            let mut own = Vec::with_capacity(cell.len());
            for k in 0..cell.len() {
                let a = cell[k];
                let b = cell[(k + 1) % cell.len()];
                let edge_index = *index.entry(edge_key(a, b)).or_insert_with(|| {
                    edges.push(GridEdge {
                        vertices: [a, b],
                        left: None,
                        right: None,
                    });
                    edges.len() - 1
                });
                let edge = &mut edges[edge_index];
                if edge.vertices == [a, b] && edge.left.is_none() {
                    edge.left = Some(cell_index);
                } else {
                    edge.right = Some(cell_index);
                }
                own.push(edge_index);
            }
            cell_edges.push(own);
        }
        (edges, cell_edges)
    }

    pub fn edges(&self) -> Vec<GridEdge> {
        self.edge_table().0
    }

    /// Boundary edges oriented with the grid on their left.
    pub fn boundary_edges(&self) -> Vec<GridEdge> {
        self.edges()
            .into_iter()
            .filter(GridEdge::is_boundary)
            .map(|e| match e.left {
                Some(_) => e,
                None => GridEdge {
                    vertices: [e.vertices[1], e.vertices[0]],
                    left: e.right,
                    right: None,
                },
            })
            .collect()
    }

    /// Contour formed by the boundary edges, carrying their boundary types.
    pub fn boundary_contour(&self) -> Contour2D {
        let mut renumber: HashMap<usize, usize> = HashMap::new();
        let mut points = Vec::new();
        let mut edges = Vec::new();
        for edge in self.boundary_edges() {
            let [a, b] = edge.vertices.map(|v| {
                *renumber.entry(v).or_insert_with(|| {
                    points.push(self.points[v]);
                    points.len() - 1
                })
            });
            let btype = self.boundary_type(edge.vertices[0], edge.vertices[1]);
            edges.push(ContourEdge::new(a, b, btype));
        }
        Contour2D::new(points, edges)
    }

    /// Append every cell of `other`, merging congruent points.
    pub fn add_from_grid(&mut self, other: &Grid2D) {
        let map = merge_points(&mut self.points, &other.points);
        self.cells.extend(
            other
                .cells
                .iter()
                .map(|cell| cell.iter().map(|&v| map[v]).collect()),
        );
        for (&(a, b), &btype) in &other.boundary_types {
            self.set_boundary_type(map[a], map[b], btype);
        }
    }

    /// Check cell connectivity and boundary type keys.
    pub fn validate(&self) -> Result<()> {
        let n = self.points.len();
        for (index, cell) in self.cells.iter().enumerate() {
            if cell.len() < 3 {
                return Err(ModelError::DegenerateElement {
                    kind: "cell",
                    index,
                    vertices: cell.len(),
                });
            }
            check_indices("grid point", cell.iter().copied(), n)?;
        }
        check_indices(
            "boundary edge point",
            self.boundary_types.keys().flat_map(|&(a, b)| [a, b]),
            n,
        )
    }
}
