//! Project file types.
//!
//! A [`ProjectFile`] bundles the geometry state with the metadata stored
//! next to it in the `FLOW` section of a project document.

mod history;
mod project;

pub use history::{CommandHistory, CommandRecord};
pub use project::{ProjectFile, ProjectInfo};

/// Current project format version.
///
/// Written to `FLOW/INFO/FORMAT_VERSION`; older files without an INFO
/// section load with this version.
pub const FORMAT_VERSION: &str = "1.0";
