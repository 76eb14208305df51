//! 3D grid and 3D grid surface export.

use std::borrow::Cow;
use std::path::Path;

use hm_engine::{Engine, ExternalPayload, Grid3dTarget, ProgressReporter};
use hm_model::{Category, Framework};
use tracing::info;

use super::{aggregate, select, write_composite, write_single};
use crate::config::ExportConfig;
use crate::error::{PersistenceError, Result};
use crate::format::{ExportFormat, Grid3dFormat, Grid3dSurfaceFormat};

/// Export 3D grids in format `format` (`vtk3d`, `msh3d`, `gmsh3d`,
/// `tecplot3d`, `hmg3d`).
///
/// Only `hmg3d` holds several grids; the file formats take exactly one.
/// `msh3d` receives the periodic pairs of [`ExportConfig::Periodic3d`].
///
/// # Errors
///
/// Besides unknown formats and names,
/// [`UnsupportedAggregation`](crate::PersistenceError::UnsupportedAggregation)
/// when several grids are selected for a single-grid format.
pub fn export_grid3d(
    engine: &dyn Engine,
    format: &str,
    path: &Path,
    names: &[&str],
    framework: &Framework,
    config: &ExportConfig,
    reporter: ProgressReporter<'_>,
) -> Result<()> {
    let format = Grid3dFormat::parse(format)?;
    let selected = select(&framework.grids3d, names)?;

    match format.target() {
        None => write_composite(engine, path, config, reporter, |doc, options| {
            engine.write_grids3d(doc, &selected, options, reporter)
        })?,
        Some(target) => {
            let grid = aggregate(
                Category::Grid3d,
                format.id(),
                selected.iter().map(|&(_, grid)| Cow::Borrowed(grid)).collect(),
                None,
            )?;
            let periodic = if target == Grid3dTarget::Msh {
                config.periodic_3d()
            } else {
                &[]
            };
            let payload = ExternalPayload::Grid3d {
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
        "Exported 3D grids to {}",
        path.display()
    );
    Ok(())
}

/// Export the boundary surface of the 3D grid `name` (format `vtk`).
pub fn export_grid3d_surface(
    engine: &dyn Engine,
    format: &str,
    path: &Path,
    name: &str,
    framework: &Framework,
    reporter: ProgressReporter<'_>,
) -> Result<()> {
    let format = Grid3dSurfaceFormat::parse(format)?;
    let grid = framework
        .grids3d
        .get(name)
        .ok_or_else(|| PersistenceError::ObjectNotFound {
            category: Category::Grid3d,
            name: name.to_string(),
        })?;
    let surface = grid.surface();
    let payload = ExternalPayload::Surface {
        surface: &surface,
        target: format.target(),
    };
    write_single(engine, payload, path, reporter)?;

    info!(
        grid = name,
        faces = surface.n_faces(),
        "Exported 3D grid surface to {}",
        path.display()
    );
    Ok(())
}
