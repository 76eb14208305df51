//! Project document I/O.
//!
//! This module handles:
//! - Saving projects: metadata skeleton first, geometry through the engine
//! - Loading projects: metadata from the purged document, geometry through
//!   the Import Aggregator

mod load;
mod metadata;
mod save;

pub use load::{load_project, load_project_into};
pub use save::save_project;
