//! Object categories.

use std::fmt;

/// One of the four kinds of objects a project holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Contour,
    Grid2d,
    Grid3d,
    Surface3d,
}

impl Category {
    /// All categories in processing order.
    pub const ALL: [Category; 4] = [
        Category::Contour,
        Category::Grid2d,
        Category::Grid3d,
        Category::Surface3d,
    ];

    /// Document section tag holding objects of this category.
    pub fn section(self) -> &'static str {
        match self {
            Self::Contour => "CONTOUR2D",
            Self::Grid2d => "GRID2D",
            Self::Grid3d => "GRID3D",
            Self::Surface3d => "SURFACE3D",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Contour => "contour",
            Self::Grid2d => "2D grid",
            Self::Grid3d => "3D grid",
            Self::Surface3d => "3D surface",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
