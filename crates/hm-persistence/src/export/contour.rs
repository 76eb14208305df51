//! Contour export.

use std::borrow::Cow;
use std::path::Path;

use hm_engine::{Engine, ExternalPayload, ProgressReporter};
use hm_model::{Category, Contour2D, Framework};
use tracing::{debug, info};

use super::{aggregate, write_composite, write_single};
use crate::config::ExportConfig;
use crate::error::{PersistenceError, Result};
use crate::format::{ContourFormat, ExportFormat};
use crate::lookup::{ContourLookup, lookup_contour};

/// Export contours in format `format` (`vtk`, `hmc`, `tecplot`).
///
/// A name that is not a contour may name a 2D grid, whose boundary is
/// exported instead under the name `ContourOf<name>`. File formats merge
/// several contours into one; `hmc` keeps them separate.
pub fn export_contour(
    engine: &dyn Engine,
    format: &str,
    path: &Path,
    names: &[&str],
    framework: &Framework,
    config: &ExportConfig,
    reporter: ProgressReporter<'_>,
) -> Result<()> {
    let format = ContourFormat::parse(format)?;

    let mut selected: Vec<(String, Cow<'_, Contour2D>)> = Vec::with_capacity(names.len());
    for &name in names {
        match lookup_contour(framework, name) {
            ContourLookup::Found {
                contour,
                display_name,
            } => {
                debug!(name, %display_name, "resolved contour");
                selected.push((display_name, contour));
            }
            ContourLookup::NotFound => {
                return Err(PersistenceError::ObjectNotFound {
                    category: Category::Contour,
                    name: name.to_string(),
                });
            }
        }
    }
    let count = selected.len();

    match format.target() {
        None => {
            let objects: Vec<(&str, &Contour2D)> = selected
                .iter()
                .map(|(name, contour)| (name.as_str(), &**contour))
                .collect();
            write_composite(engine, path, config, reporter, |doc, options| {
                engine.write_contours(doc, &objects, options)
            })?;
        }
        Some(target) => {
            let contour = aggregate(
                Category::Contour,
                format.id(),
                selected.into_iter().map(|(_, contour)| contour).collect(),
                Some(Contour2D::add_from),
            )?;
            let payload = ExternalPayload::Contour {
                contour: &contour,
                target,
                boundary_types: &framework.boundary_types,
            };
            write_single(engine, payload, path, reporter)?;
        }
    }

    info!(
        format = format.id(),
        count,
        "Exported contours to {}",
        path.display()
    );
    Ok(())
}
