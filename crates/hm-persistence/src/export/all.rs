//! Whole-project export.

use std::path::Path;

use hm_engine::{
    CompositeOptions, DocumentGuard, DocumentHandle, Encoding, Engine, ProgressReporter,
    merge_cleanup,
};
use hm_model::{Contour2D, Framework, Grid2D, Grid3D, Surface3D};
use tracing::{debug, info};

use crate::error::{PersistenceError, Result};

/// Write every object of `framework` into a native document.
///
/// Categories are written in the order contours, 2D grids, 3D grids,
/// surfaces. With `writer` set the objects are appended to that open
/// document, which is left open for the caller. Otherwise a new document
/// is created and finalized at `path`; finalizing is attempted even when
/// writing failed, and the write error is the one returned.
pub fn export_all(
    engine: &dyn Engine,
    path: &Path,
    encoding: Encoding,
    framework: &Framework,
    writer: Option<DocumentHandle>,
    reporter: ProgressReporter<'_>,
) -> Result<()> {
    match writer {
        Some(doc) => write_categories(engine, doc, encoding, framework, reporter),
        None => {
            let guard = DocumentGuard::create(engine)?;
            let written = write_categories(engine, guard.handle(), encoding, framework, reporter);
            finish_document(guard, path, written, reporter)?;
            info!("Exported project geometry to {}", path.display());
            Ok(())
        }
    }
}

/// Report "Save to file", finalize the document and report "Done".
///
/// The document is finalized whatever `written` holds.
pub(crate) fn finish_document(
    guard: DocumentGuard<'_>,
    path: &Path,
    written: Result<()>,
    reporter: ProgressReporter<'_>,
) -> Result<()> {
    let written = written.and_then(|()| {
        reporter
            .report("Save to file", "", 0.8, false)
            .map_err(PersistenceError::from)
    });
    let finalized = guard.finalize(path).map_err(PersistenceError::from);
    merge_cleanup(written, finalized)?;
    reporter.report("Done", "", 1.0, true)?;
    Ok(())
}

/// Composite writes for a whole framework.
///
/// Every name comes from `framework` itself, so there is nothing to resolve
/// and the engine writers are called directly instead of going through the
/// per-category export entry points.
fn write_categories(
    engine: &dyn Engine,
    doc: DocumentHandle,
    encoding: Encoding,
    framework: &Framework,
    reporter: ProgressReporter<'_>,
) -> Result<()> {
    let options = CompositeOptions {
        encoding,
        aux_fields: &[],
    };

    reporter.report("Write contours", "", 0.0, false)?;
    let contours: Vec<(&str, &Contour2D)> = framework.contours.iter().collect();
    engine.write_contours(doc, &contours, &options)?;
    debug!(count = contours.len(), "wrote contours");

    reporter.report("Write grids", "", 0.1, false)?;
    let grids: Vec<(&str, &Grid2D)> = framework.grids2d.iter().collect();
    engine.write_grids2d(doc, &grids, &options)?;
    debug!(count = grids.len(), "wrote 2D grids");

    reporter.report("Write grids 3d", "", 0.3, false)?;
    let grids3d: Vec<(&str, &Grid3D)> = framework.grids3d.iter().collect();
    engine.write_grids3d(doc, &grids3d, &options, reporter.section(0.3, 0.6))?;
    debug!(count = grids3d.len(), "wrote 3D grids");

    reporter.report("Write surfaces", "", 0.6, false)?;
    let surfaces: Vec<(&str, &Surface3D)> = framework.surfaces3d.iter().collect();
    engine.write_surfaces3d(doc, &surfaces, &options)?;
    debug!(count = surfaces.len(), "wrote surfaces");

    Ok(())
}
