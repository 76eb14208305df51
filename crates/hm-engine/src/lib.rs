//! Engine interface for HybMesh project documents.
//!
//! Project persistence is split between an orchestrator and an *engine*.
//! The engine owns native document resources and knows how individual
//! objects map to document nodes and external files; the orchestrator
//! decides which objects go where and in which order.
//!
//! This crate defines the seam between the two:
//!
//! - [`Engine`] - the operations an engine provides
//! - [`DocumentHandle`] / [`NodeHandle`] - opaque engine resource ids
//! - [`DocumentGuard`] / [`NodeSet`] - scoped ownership that releases
//!   handles on every exit path
//! - [`ProgressReporter`] - hierarchical progress with cancellation
//! - [`tree`] - the owned XML element tree shared by engine and orchestrator
//!
//! # Resource discipline
//!
//! Every handle returned by [`Engine::new_document`], [`Engine::open_document`]
//! or [`Engine::query`] must be released exactly once. Wrap handles in a
//! guard as soon as they are acquired:
//!
//! ```ignore
//! let doc = DocumentGuard::open(engine, path)?;
//! let grids = NodeSet::query(engine, doc.handle(), "GRID2D")?;
//! // ... read nodes; any `?` above or below releases both guards
//! ```

mod engine;
mod error;
mod guard;
mod handle;
mod options;
mod progress;
mod target;
pub mod tree;

pub use engine::{CompositeOptions, Engine, ExternalPayload, Named};
pub use error::{EngineError, Result};
pub use guard::{DocumentGuard, NodeSet, merge_cleanup};
pub use handle::{DocumentHandle, NodeHandle};
pub use options::{AuxField, Encoding, PeriodicCondition2d, PeriodicCondition3d};
pub use progress::{CallbackSink, CancelFlag, ProgressEvent, ProgressReporter, ProgressSink};
pub use target::{ContourTarget, Grid2dTarget, Grid3dTarget, SurfaceTarget};

/// Root element of every project document.
pub const ROOT_TAG: &str = "HybMeshData";

/// Path from the root to the section holding geometry state.
pub const STATE_PATH: &str = "FLOW/STATE";
