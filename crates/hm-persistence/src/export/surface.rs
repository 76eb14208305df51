//! Standalone 3D surface export.

use std::borrow::Cow;
use std::path::Path;

use hm_engine::{Engine, ExternalPayload, ProgressReporter};
use hm_model::{Category, Framework};
use tracing::info;

use super::{aggregate, select, write_composite, write_single};
use crate::config::ExportConfig;
use crate::error::Result;
use crate::format::{ExportFormat, SurfaceFormat};

/// Export 3D surfaces in format `format` (`vtk`, `hms`).
pub fn export_surface(
    engine: &dyn Engine,
    format: &str,
    path: &Path,
    names: &[&str],
    framework: &Framework,
    config: &ExportConfig,
    reporter: ProgressReporter<'_>,
) -> Result<()> {
    let format = SurfaceFormat::parse(format)?;
    let selected = select(&framework.surfaces3d, names)?;

    match format.target() {
        None => write_composite(engine, path, config, reporter, |doc, options| {
            engine.write_surfaces3d(doc, &selected, options)
        })?,
        Some(target) => {
            let surface = aggregate(
                Category::Surface3d,
                format.id(),
                selected.iter().map(|&(_, surface)| Cow::Borrowed(surface)).collect(),
                None,
            )?;
            let payload = ExternalPayload::Surface {
                surface: &surface,
                target,
            };
            write_single(engine, payload, path, reporter)?;
        }
    }

    info!(
        format = format.id(),
        count = selected.len(),
        "Exported surfaces to {}",
        path.display()
    );
    Ok(())
}
