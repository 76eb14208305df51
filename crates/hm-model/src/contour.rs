//! Planar contours.

use std::collections::BTreeSet;

use crate::error::{ModelError, Result, check_indices};
use crate::geometry::{Point2, merge_points};

/// Contour edge between two points, tagged with a boundary type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContourEdge {
    pub start: usize,
    pub end: usize,
    pub btype: i32,
}

impl ContourEdge {
    pub const fn new(start: usize, end: usize, btype: i32) -> Self {
        Self { start, end, btype }
    }
}

/// A set of edges over a shared point list.
///
/// A contour may be open, closed or consist of several disjoint pieces.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Contour2D {
    pub points: Vec<Point2>,
    pub edges: Vec<ContourEdge>,
}

impl Contour2D {
    pub fn new(points: Vec<Point2>, edges: Vec<ContourEdge>) -> Self {
        Self { points, edges }
    }

    /// Closed polygon through `points` with every edge of type `btype`.
    pub fn closed_polygon(points: Vec<Point2>, btype: i32) -> Self {
        let n = points.len();
        let edges = (0..n)
            .map(|i| ContourEdge::new(i, (i + 1) % n, btype))
            .collect();
        Self { points, edges }
    }

    pub fn n_points(&self) -> usize {
        self.points.len()
    }

    pub fn n_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Distinct boundary types used by the edges, ascending.
    pub fn boundary_types(&self) -> BTreeSet<i32> {
        self.edges.iter().map(|e| e.btype).collect()
    }

    /// Append all edges of `other`, merging congruent points.
    pub fn add_from(&mut self, other: &Contour2D) {
        let map = merge_points(&mut self.points, &other.points);
        self.edges.extend(
            other
                .edges
                .iter()
                .map(|e| ContourEdge::new(map[e.start], map[e.end], e.btype)),
        );
    }

    /// Check edge connectivity against the point list.
    pub fn validate(&self) -> Result<()> {
        let n = self.points.len();
        for (index, edge) in self.edges.iter().enumerate() {
            check_indices("contour point", [edge.start, edge.end], n)?;
            if edge.start == edge.end {
                return Err(ModelError::DegenerateElement {
                    kind: "contour edge",
                    index,
                    vertices: 1,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square(offset: f64, btype: i32) -> Contour2D {
        Contour2D::closed_polygon(
            vec![
                Point2::new(offset, 0.0),
                Point2::new(offset + 1.0, 0.0),
                Point2::new(offset + 1.0, 1.0),
                Point2::new(offset, 1.0),
            ],
            btype,
        )
    }

    #[test]
    fn test_closed_polygon() {
        let c = unit_square(0.0, 3);
        assert_eq!(c.n_edges(), 4);
        assert_eq!(c.edges[3], ContourEdge::new(3, 0, 3));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_add_from_merges_shared_points() {
        let mut c = unit_square(0.0, 1);
        c.add_from(&unit_square(1.0, 2));
        // Two corner points are shared.
        assert_eq!(c.n_points(), 6);
        assert_eq!(c.n_edges(), 8);
        assert_eq!(c.boundary_types().into_iter().collect::<Vec<_>>(), vec![1, 2]);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_index() {
        let c = Contour2D::new(vec![Point2::default()], vec![ContourEdge::new(0, 4, 0)]);
        assert!(matches!(
            c.validate(),
            Err(ModelError::InvalidIndex { index: 4, .. })
        ));
    }
}
