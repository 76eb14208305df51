//! External (single-object) export targets.

/// External formats for contours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContourTarget {
    Vtk,
    Tecplot,
}

/// External formats for 2D grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grid2dTarget {
    Vtk,
    /// Fluent mesh.
    Msh,
    Ggen,
    Gmsh,
    Tecplot,
}

/// External formats for 3D grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grid3dTarget {
    Vtk,
    /// Fluent mesh.
    Msh,
    Gmsh,
    Tecplot,
}

/// External formats for surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceTarget {
    Vtk,
}

impl ContourTarget {
    pub fn name(self) -> &'static str {
        match self {
            Self::Vtk => "vtk",
            Self::Tecplot => "tecplot",
        }
    }
}

impl Grid2dTarget {
    pub fn name(self) -> &'static str {
        match self {
            Self::Vtk => "vtk",
            Self::Msh => "msh",
            Self::Ggen => "ggen",
            Self::Gmsh => "gmsh",
            Self::Tecplot => "tecplot",
        }
    }
}

impl Grid3dTarget {
    pub fn name(self) -> &'static str {
        match self {
            Self::Vtk => "vtk3d",
            Self::Msh => "msh3d",
            Self::Gmsh => "gmsh3d",
            Self::Tecplot => "tecplot3d",
        }
    }
}

impl SurfaceTarget {
    pub fn name(self) -> &'static str {
        match self {
            Self::Vtk => "vtk",
        }
    }
}
