//! 2D grid export.

use std::borrow::Cow;
use std::path::Path;

use hm_engine::{Engine, ExternalPayload, Grid2dTarget, ProgressReporter};
use hm_model::{Category, Framework, Grid2D};
use tracing::info;

use super::{aggregate, select, write_composite, write_single};
use crate::config::ExportConfig;
use crate::error::Result;
use crate::format::{ExportFormat, Grid2dFormat};

/// Export 2D grids in format `format` (`vtk`, `hmg`, `msh`, `ggen`, `gmsh`,
/// `tecplot`).
///
/// `hmg` keeps every grid as a separate object. The other formats merge
/// several grids into one, joining congruent points. `msh` receives the
/// periodic pairs of [`ExportConfig::Periodic2d`].
///
/// # Errors
///
/// [`UnsupportedFormat`](crate::PersistenceError::UnsupportedFormat) for an
/// unknown id, [`ObjectNotFound`](crate::PersistenceError::ObjectNotFound)
/// for a missing name; in both cases nothing is written.
pub fn export_grid2d(
    engine: &dyn Engine,
    format: &str,
    path: &Path,
    names: &[&str],
    framework: &Framework,
    config: &ExportConfig,
    reporter: ProgressReporter<'_>,
) -> Result<()> {
    let format = Grid2dFormat::parse(format)?;
    let selected = select(&framework.grids2d, names)?;

    match format.target() {
        None => write_composite(engine, path, config, reporter, |doc, options| {
            engine.write_grids2d(doc, &selected, options)
        })?,
        Some(target) => {
            let grid = aggregate(
                Category::Grid2d,
                format.id(),
                selected.iter().map(|&(_, grid)| Cow::Borrowed(grid)).collect(),
                Some(Grid2D::add_from_grid),
            )?;
            let periodic = if target == Grid2dTarget::Msh {
                config.periodic_2d()
            } else {
                &[]
            };
            let payload = ExternalPayload::Grid2d {
                grid: &grid,
                target,
                boundary_types: &framework.boundary_types,
                periodic,
            };
            write_single(engine, payload, path, reporter)?;
        }
    }

    info!(
        format = format.id(),
        count = selected.len(),
        "Exported 2D grids to {}",
        path.display()
    );
    Ok(())
}
