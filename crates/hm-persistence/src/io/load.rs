//! Project loading operations.

use std::path::Path;

use hm_engine::tree::Element;
use hm_engine::{
    DocumentGuard, DocumentHandle, Engine, ProgressReporter, ROOT_TAG, STATE_PATH, merge_cleanup,
};
use hm_model::{Category, Framework};
use tracing::{debug, info};

use super::metadata;
use crate::error::{PersistenceError, Result};
use crate::import::import_all;
use crate::types::ProjectFile;

/// Load a project from a HybMesh project file.
pub fn load_project(
    engine: &dyn Engine,
    path: &Path,
    reporter: ProgressReporter<'_>,
) -> Result<ProjectFile> {
    let mut project = ProjectFile::default();
    load_project_into(engine, &mut project, path, reporter)?;
    Ok(project)
}

/// Load a project into `receiver`, replacing its contents.
///
/// A file without a `FLOW/STATE` section loads as a project with no
/// objects. On failure `receiver` may be left partially filled.
///
/// # Errors
///
/// [`PersistenceError::OpenFailure`] if the file cannot be read,
/// [`PersistenceError::NoProjectData`] if it is not rooted at
/// `HybMeshData` or has no `FLOW` section.
pub fn load_project_into(
    engine: &dyn Engine,
    receiver: &mut ProjectFile,
    path: &Path,
    reporter: ProgressReporter<'_>,
) -> Result<()> {
    *receiver = ProjectFile::default();

    let reader = DocumentGuard::open(engine, path)?;
    let loaded = read_project(engine, reader.handle(), receiver, path, reporter);
    merge_cleanup(loaded, reader.release().map_err(PersistenceError::from))?;
    reporter.report("Done", "", 1.0, true)?;

    let objects: usize = Category::ALL
        .iter()
        .map(|&category| receiver.framework.count(category))
        .sum();
    info!(objects, "Loaded project from {}", path.display());
    Ok(())
}

fn read_project(
    engine: &dyn Engine,
    doc: DocumentHandle,
    receiver: &mut ProjectFile,
    path: &Path,
    reporter: ProgressReporter<'_>,
) -> Result<()> {
    let purged = Element::parse(&engine.purged_string(doc)?)?;
    let flow = purged
        .child(metadata::FLOW)
        .filter(|_| purged.name == ROOT_TAG)
        .ok_or_else(|| PersistenceError::NoProjectData {
            path: path.to_path_buf(),
        })?;
    receiver.info = metadata::parse_info(flow)?;
    receiver.history = metadata::parse_commands(flow)?;
    let boundary_types = metadata::parse_btypes(flow)?;

    receiver.framework = if engine.change_base(doc, STATE_PATH)? {
        import_all(engine, doc, reporter)?.into_framework(boundary_types)?
    } else {
        debug!("no STATE section, project has no objects");
        let mut framework = Framework::new();
        framework.boundary_types = boundary_types;
        framework
    };
    Ok(())
}
