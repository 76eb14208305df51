//! Persistence and export for HybMesh projects.
//!
//! This crate saves and loads `.hmp` project documents and exports project
//! objects to native and external mesh formats. All document work goes
//! through an [`Engine`](hm_engine::Engine); handles are owned by scoped
//! guards so that every document and node is released on success, failure
//! and cancellation alike.
//!
//! # Features
//!
//! - **Project files** holding metadata, command history and all geometry
//! - **Typed export formats** per category, with merge rules for file
//!   formats holding a single object
//! - **Hierarchical progress** with cancellation through
//!   [`ProgressReporter`](hm_engine::ProgressReporter)
//!
//! # File Format
//!
//! ```text
//! HybMeshData
//! └── FLOW
//!     ├── INFO       format version and timestamps
//!     ├── COMMANDS   recorded command history
//!     └── STATE      BTYPES, then CONTOUR2D, GRID2D, GRID3D, SURFACE3D
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use hm_engine::{Encoding, ProgressReporter};
//! use hm_hmxml::XmlEngine;
//! use hm_persistence::{ExportConfig, export_grid2d, load_project, save_project};
//!
//! let engine = XmlEngine::new();
//! let mut project = load_project(&engine, Path::new("case.hmp"), ProgressReporter::silent())?;
//!
//! export_grid2d(
//!     &engine,
//!     "vtk",
//!     Path::new("grid.vtk"),
//!     &["Grid1"],
//!     &project.framework,
//!     &ExportConfig::default(),
//!     ProgressReporter::silent(),
//! )?;
//!
//! save_project(
//!     &engine,
//!     &mut project,
//!     Path::new("case.hmp"),
//!     Encoding::Binary,
//!     ProgressReporter::silent(),
//! )?;
//! # Ok::<(), hm_persistence::PersistenceError>(())
//! ```
//!
//! # Architecture
//!
//! - `types/` - Project file types (info, history)
//! - `io/` - Project save and load
//! - `export/` - Export Dispatcher and whole-project export
//! - `import.rs` - Import Aggregator
//! - `format.rs`, `config.rs`, `lookup.rs` - Export formats, options and
//!   contour resolution
//! - `error.rs` - Error types with user-friendly messages

mod config;
mod error;
mod export;
mod format;
mod import;
mod io;
mod lookup;
mod types;

pub use config::{CompositeConfig, ExportConfig};
pub use error::{PersistenceError, Result};
pub use export::{
    export_all, export_contour, export_grid2d, export_grid3d, export_grid3d_surface,
    export_surface,
};
pub use format::{
    ContourFormat, ExportFormat, Grid2dFormat, Grid3dFormat, Grid3dSurfaceFormat, SurfaceFormat,
};
pub use import::{ImportedObjects, import_all, import_objects};
pub use io::{load_project, load_project_into, save_project};
pub use lookup::{ContourLookup, GRID_CONTOUR_PREFIX, lookup_contour};
pub use types::{CommandHistory, CommandRecord, FORMAT_VERSION, ProjectFile, ProjectInfo};
