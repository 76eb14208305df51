//! Command-line front end for HybMesh project persistence.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod progress;
pub mod summary;
