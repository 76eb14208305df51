//! Reference document engine for HybMesh projects.
//!
//! [`XmlEngine`] implements [`hm_engine::Engine`] on top of in-memory XML
//! trees:
//!
//! - documents are parsed into [`hm_engine::tree::Element`] trees and written
//!   back on finalize
//! - contours, grids and surfaces are encoded as `CONTOUR2D`, `GRID2D`,
//!   `GRID3D` and `SURFACE3D` elements with ASCII or hex-binary arrays
//! - single objects are exported to VTK, Tecplot, Gmsh, Fluent and GridGen
//!   files
//!
//! # Example
//!
//! ```no_run
//! use hm_engine::{DocumentGuard, Engine, NodeSet};
//! use hm_hmxml::XmlEngine;
//! use std::path::Path;
//!
//! let engine = XmlEngine::new();
//! let doc = DocumentGuard::open(&engine, Path::new("project.hmp"))?;
//! engine.change_base(doc.handle(), "FLOW/STATE")?;
//! let grids = NodeSet::query(&engine, doc.handle(), "GRID2D")?;
//! for &node in grids.nodes() {
//!     let grid = engine.read_grid2d(node)?;
//!     println!("{}: {} cells", grid.name, grid.object.n_cells());
//! }
//! # Ok::<(), hm_engine::EngineError>(())
//! ```

mod array;
mod codec;
mod engine;
mod export;

pub use engine::XmlEngine;
