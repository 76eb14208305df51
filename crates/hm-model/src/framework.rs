//! Project model aggregate.

use crate::boundary::BoundaryTypes;
use crate::category::Category;
use crate::collection::NamedCollection;
use crate::contour::Contour2D;
use crate::error::Result;
use crate::grid2d::Grid2D;
use crate::grid3d::Grid3D;
use crate::surface::Surface3D;

/// Geometry state of a project: four named collections and the boundary
/// type table.
#[derive(Debug, Clone, PartialEq)]
pub struct Framework {
    pub contours: NamedCollection<Contour2D>,
    pub grids2d: NamedCollection<Grid2D>,
    pub grids3d: NamedCollection<Grid3D>,
    pub surfaces3d: NamedCollection<Surface3D>,
    pub boundary_types: BoundaryTypes,
}

impl Default for Framework {
    fn default() -> Self {
        Self {
            contours: NamedCollection::new(Category::Contour),
            grids2d: NamedCollection::new(Category::Grid2d),
            grids3d: NamedCollection::new(Category::Grid3d),
            surfaces3d: NamedCollection::new(Category::Surface3d),
            boundary_types: BoundaryTypes::new(),
        }
    }
}

impl Framework {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_contour(&mut self, name: impl Into<String>, contour: Contour2D) -> Result<()> {
        self.contours.add(name, contour)
    }

    pub fn add_grid2d(&mut self, name: impl Into<String>, grid: Grid2D) -> Result<()> {
        self.grids2d.add(name, grid)
    }

    pub fn add_grid3d(&mut self, name: impl Into<String>, grid: Grid3D) -> Result<()> {
        self.grids3d.add(name, grid)
    }

    pub fn add_surface3d(&mut self, name: impl Into<String>, surface: Surface3D) -> Result<()> {
        self.surfaces3d.add(name, surface)
    }

    /// Names of every object of a category, in insertion order.
    pub fn names(&self, category: Category) -> Vec<&str> {
        match category {
            Category::Contour => self.contours.names().collect(),
            Category::Grid2d => self.grids2d.names().collect(),
            Category::Grid3d => self.grids3d.names().collect(),
            Category::Surface3d => self.surfaces3d.names().collect(),
        }
    }

    pub fn count(&self, category: Category) -> usize {
        match category {
            Category::Contour => self.contours.len(),
            Category::Grid2d => self.grids2d.len(),
            Category::Grid3d => self.grids3d.len(),
            Category::Surface3d => self.surfaces3d.len(),
        }
    }

    /// True if no category holds an object.
    pub fn is_empty(&self) -> bool {
        Category::ALL.iter().all(|&c| self.count(c) == 0)
    }

    /// Drop all objects and boundary types.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point2;

    #[test]
    fn test_framework_counts() {
        let mut fw = Framework::new();
        assert!(fw.is_empty());
        fw.add_grid2d("g1", Grid2D::rectangle(0.0, 0.0, 1.0, 1.0, 1, 1))
            .unwrap();
        fw.add_contour(
            "c1",
            Contour2D::closed_polygon(
                vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(0.0, 1.0)],
                0,
            ),
        )
        .unwrap();
        assert_eq!(fw.count(Category::Grid2d), 1);
        assert_eq!(fw.names(Category::Contour), vec!["c1"]);
        assert!(!fw.is_empty());

        fw.clear();
        assert!(fw.is_empty());
    }
}
