//! In-memory project model for HybMesh.
//!
//! A project ([`Framework`]) holds four named collections of geometric
//! objects plus the boundary type table shared by all of them:
//!
//! - [`Contour2D`] - planar contours made of boundary-typed edges
//! - [`Grid2D`] - planar grids made of polygonal cells
//! - [`Grid3D`] - face-based volumetric grids
//! - [`Surface3D`] - polygonal surfaces in space
//!
//! Names are unique within each category. Collections keep the order in
//! which objects were added, which is also the order they are written and
//! read back in.
//!
//! The geometry types are deliberately small: they carry what persistence
//! and export need (vertex lists, connectivity, boundary types) and a few
//! structural helpers such as merging grids or extracting a grid's boundary
//! contour. Mesh construction lives elsewhere.

mod boundary;
mod category;
mod collection;
mod contour;
mod error;
mod framework;
mod geometry;
mod grid2d;
mod grid3d;
mod surface;

pub use boundary::{BoundaryType, BoundaryTypes};
pub use category::Category;
pub use collection::NamedCollection;
pub use contour::{Contour2D, ContourEdge};
pub use error::{ModelError, Result};
pub use framework::Framework;
pub use geometry::{Point2, Point3};
pub use grid2d::{Grid2D, GridEdge};
pub use grid3d::{Grid3D, GridFace};
pub use surface::{Surface3D, SurfaceFace};
