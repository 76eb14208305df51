//! Export format identifiers per object category.
//!
//! Each family lists its ids and maps them onto an engine target. Formats
//! without a target are composite: the objects are written as sibling
//! elements of a native HybMesh document.

use hm_engine::{ContourTarget, Grid2dTarget, Grid3dTarget, SurfaceTarget};
use hm_model::Category;

use crate::error::{PersistenceError, Result};

/// A family of format ids accepted for one category.
pub trait ExportFormat: Copy + Sized + 'static {
    /// Category reported in errors.
    const CATEGORY: Category;

    /// Every format of the family, in display order.
    const ALL: &'static [Self];

    fn id(self) -> &'static str;

    /// Look up a format id.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::UnsupportedFormat`] for unknown ids.
    fn parse(id: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|format| format.id() == id)
            .ok_or_else(|| PersistenceError::UnsupportedFormat {
                category: Self::CATEGORY,
                format: id.to_string(),
            })
    }
}

/// Export formats for 2D grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grid2dFormat {
    Vtk,
    Hmg,
    Msh,
    Ggen,
    Gmsh,
    Tecplot,
}

impl Grid2dFormat {
    pub fn target(self) -> Option<Grid2dTarget> {
        match self {
            Self::Vtk => Some(Grid2dTarget::Vtk),
            Self::Hmg => None,
            Self::Msh => Some(Grid2dTarget::Msh),
            Self::Ggen => Some(Grid2dTarget::Ggen),
            Self::Gmsh => Some(Grid2dTarget::Gmsh),
            Self::Tecplot => Some(Grid2dTarget::Tecplot),
        }
    }
}

impl ExportFormat for Grid2dFormat {
    const CATEGORY: Category = Category::Grid2d;
    const ALL: &'static [Self] = &[
        Self::Vtk,
        Self::Hmg,
        Self::Msh,
        Self::Ggen,
        Self::Gmsh,
        Self::Tecplot,
    ];

    fn id(self) -> &'static str {
        match self {
            Self::Vtk => "vtk",
            Self::Hmg => "hmg",
            Self::Msh => "msh",
            Self::Ggen => "ggen",
            Self::Gmsh => "gmsh",
            Self::Tecplot => "tecplot",
        }
    }
}

/// Export formats for 3D grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grid3dFormat {
    Vtk,
    Msh,
    Gmsh,
    Tecplot,
    Hmg,
}

impl Grid3dFormat {
    pub fn target(self) -> Option<Grid3dTarget> {
        match self {
            Self::Vtk => Some(Grid3dTarget::Vtk),
            Self::Msh => Some(Grid3dTarget::Msh),
            Self::Gmsh => Some(Grid3dTarget::Gmsh),
            Self::Tecplot => Some(Grid3dTarget::Tecplot),
            Self::Hmg => None,
        }
    }
}

impl ExportFormat for Grid3dFormat {
    const CATEGORY: Category = Category::Grid3d;
    const ALL: &'static [Self] = &[Self::Vtk, Self::Msh, Self::Gmsh, Self::Tecplot, Self::Hmg];

    fn id(self) -> &'static str {
        match self {
            Self::Vtk => "vtk3d",
            Self::Msh => "msh3d",
            Self::Gmsh => "gmsh3d",
            Self::Tecplot => "tecplot3d",
            Self::Hmg => "hmg3d",
        }
    }
}

/// Export formats for contours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContourFormat {
    Vtk,
    Hmc,
    Tecplot,
}

impl ContourFormat {
    pub fn target(self) -> Option<ContourTarget> {
        match self {
            Self::Vtk => Some(ContourTarget::Vtk),
            Self::Hmc => None,
            Self::Tecplot => Some(ContourTarget::Tecplot),
        }
    }
}

impl ExportFormat for ContourFormat {
    const CATEGORY: Category = Category::Contour;
    const ALL: &'static [Self] = &[Self::Vtk, Self::Hmc, Self::Tecplot];

    fn id(self) -> &'static str {
        match self {
            Self::Vtk => "vtk",
            Self::Hmc => "hmc",
            Self::Tecplot => "tecplot",
        }
    }
}

/// Export formats for standalone 3D surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceFormat {
    Vtk,
    Hms,
}

impl SurfaceFormat {
    pub fn target(self) -> Option<SurfaceTarget> {
        match self {
            Self::Vtk => Some(SurfaceTarget::Vtk),
            Self::Hms => None,
        }
    }
}

impl ExportFormat for SurfaceFormat {
    const CATEGORY: Category = Category::Surface3d;
    const ALL: &'static [Self] = &[Self::Vtk, Self::Hms];

    fn id(self) -> &'static str {
        match self {
            Self::Vtk => "vtk",
            Self::Hms => "hms",
        }
    }
}

/// Export formats for the boundary surface of a 3D grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grid3dSurfaceFormat {
    Vtk,
}

impl Grid3dSurfaceFormat {
    pub fn target(self) -> SurfaceTarget {
        match self {
            Self::Vtk => SurfaceTarget::Vtk,
        }
    }
}

impl ExportFormat for Grid3dSurfaceFormat {
    const CATEGORY: Category = Category::Grid3d;
    const ALL: &'static [Self] = &[Self::Vtk];

    fn id(self) -> &'static str {
        match self {
            Self::Vtk => "vtk",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_ids() {
        assert_eq!(Grid2dFormat::parse("msh").unwrap(), Grid2dFormat::Msh);
        assert_eq!(Grid3dFormat::parse("tecplot3d").unwrap(), Grid3dFormat::Tecplot);
        assert_eq!(ContourFormat::parse("hmc").unwrap(), ContourFormat::Hmc);
        assert!(SurfaceFormat::parse("hms").unwrap().target().is_none());
    }

    #[test]
    fn test_ids_are_category_specific() {
        assert!(Grid3dFormat::parse("msh").is_err());
        assert!(ContourFormat::parse("ggen").is_err());
        let error = Grid2dFormat::parse("VTK").unwrap_err();
        assert!(matches!(
            error,
            PersistenceError::UnsupportedFormat {
                category: Category::Grid2d,
                ..
            }
        ));
    }

    #[test]
    fn test_every_id_round_trips() {
        for &format in Grid2dFormat::ALL {
            assert_eq!(Grid2dFormat::parse(format.id()).unwrap(), format);
        }
        for &format in Grid3dFormat::ALL {
            assert_eq!(Grid3dFormat::parse(format.id()).unwrap(), format);
        }
    }
}
