//! Project saving operations.

use std::path::Path;

use hm_engine::{DocumentGuard, Encoding, Engine, ProgressReporter, STATE_PATH};
use tracing::info;

use super::metadata;
use crate::error::{PersistenceError, Result};
use crate::export::{export_all, finish_document};
use crate::types::ProjectFile;

/// Save a project to a HybMesh project file.
///
/// The metadata (info, command history, boundary types) is written first;
/// the file is then reopened as a writer and every object is appended to
/// its `FLOW/STATE` section. The writer is finalized even if writing the
/// geometry failed.
///
/// The file is written in place: a failed save may leave a partial file.
pub fn save_project(
    engine: &dyn Engine,
    project: &mut ProjectFile,
    path: &Path,
    encoding: Encoding,
    reporter: ProgressReporter<'_>,
) -> Result<()> {
    // Update the last saved timestamp
    project.touch();

    metadata::project_skeleton(project)?.write_file(path)?;

    let writer = DocumentGuard::open(engine, path)?;
    let written = engine
        .change_base(writer.handle(), STATE_PATH)
        .map_err(PersistenceError::from)
        .and_then(|found| {
            if !found {
                return Err(PersistenceError::metadata("FLOW", "no STATE section"));
            }
            export_all(
                engine,
                path,
                encoding,
                &project.framework,
                Some(writer.handle()),
                reporter,
            )
        });
    finish_document(writer, path, written, reporter)?;

    info!(encoding = %encoding, "Saved project to {}", path.display());
    Ok(())
}
