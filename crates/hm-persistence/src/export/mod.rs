//! Export Dispatcher.
//!
//! Each entry point parses the format id, resolves every requested name and
//! only then touches the engine, so an unknown format or a missing object
//! never leaves a file behind.
//!
//! Composite formats write all selected objects into one native document:
//! the caller's open writer if [`CompositeConfig::writer`] is set, otherwise
//! a new document finalized at the destination. Single-object formats merge
//! the selection where the category supports it (2D grids, contours) and
//! reject several objects otherwise.
//!
//! [`CompositeConfig::writer`]: crate::CompositeConfig::writer

mod all;
mod contour;
mod grid2d;
mod grid3d;
mod surface;

pub use all::export_all;
pub(crate) use all::finish_document;
pub use contour::export_contour;
pub use grid2d::export_grid2d;
pub use grid3d::{export_grid3d, export_grid3d_surface};
pub use surface::export_surface;

use std::borrow::Cow;
use std::path::Path;

use hm_engine::{
    CompositeOptions, DocumentGuard, DocumentHandle, Engine, ExternalPayload, ProgressReporter,
};
use hm_model::{Category, NamedCollection};
use tracing::debug;

use crate::config::ExportConfig;
use crate::error::{PersistenceError, Result};

/// Resolve every name in `collection`, failing on the first missing one.
fn select<'a, 'n, T>(
    collection: &'a NamedCollection<T>,
    names: &[&'n str],
) -> Result<Vec<(&'n str, &'a T)>> {
    names
        .iter()
        .map(|&name| {
            collection
                .get(name)
                .map(|object| (name, object))
                .ok_or_else(|| PersistenceError::ObjectNotFound {
                    category: collection.category(),
                    name: name.to_string(),
                })
        })
        .collect()
}

/// Reduce a selection to the single object a file format holds.
///
/// One object passes through unchanged. Several objects are folded with
/// `merge`, or rejected when the category cannot be merged.
fn aggregate<'a, T: Clone>(
    category: Category,
    format: &'static str,
    objects: Vec<Cow<'a, T>>,
    merge: Option<fn(&mut T, &T)>,
) -> Result<Cow<'a, T>> {
    let count = objects.len();
    let mut objects = objects.into_iter();
    let first = objects
        .next()
        .ok_or(PersistenceError::EmptySelection { category })?;
    if count == 1 {
        return Ok(first);
    }
    let Some(merge) = merge else {
        return Err(PersistenceError::UnsupportedAggregation {
            category,
            format,
            count,
        });
    };
    let mut merged = first.into_owned();
    for object in objects {
        merge(&mut merged, &object);
    }
    debug!(%category, count, "merged selection");
    Ok(Cow::Owned(merged))
}

/// Write a composite selection into the caller's writer, or into a new
/// document finalized at `path`.
fn write_composite(
    engine: &dyn Engine,
    path: &Path,
    config: &ExportConfig,
    reporter: ProgressReporter<'_>,
    write: impl FnOnce(DocumentHandle, &CompositeOptions<'_>) -> hm_engine::Result<()>,
) -> Result<()> {
    let (options, writer) = config.composite();
    reporter.report("Writing file", "", 0.0, false)?;
    match writer {
        Some(doc) => {
            debug!(%doc, "writing into caller document");
            write(doc, &options)?;
        }
        None => {
            let guard = DocumentGuard::create(engine)?;
            write(guard.handle(), &options)?;
            guard.finalize(path)?;
        }
    }
    reporter.report("Done", "", 1.0, true)?;
    Ok(())
}

/// Write one object to an external file.
fn write_single(
    engine: &dyn Engine,
    payload: ExternalPayload<'_>,
    path: &Path,
    reporter: ProgressReporter<'_>,
) -> Result<()> {
    engine.write_external(payload, path, reporter)?;
    reporter.report("Done", "", 1.0, true)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hm_model::{Grid2D, Grid3D};

    #[test]
    fn test_select_keeps_request_order() {
        let mut grids = NamedCollection::new(Category::Grid2d);
        grids.add("a", Grid2D::rectangle(0.0, 0.0, 1.0, 1.0, 1, 1)).unwrap();
        grids.add("b", Grid2D::rectangle(1.0, 0.0, 1.0, 1.0, 1, 1)).unwrap();

        let selected = select(&grids, &["b", "a"]).unwrap();
        let names: Vec<&str> = selected.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, ["b", "a"]);

        let error = select(&grids, &["a", "zzz"]).unwrap_err();
        assert!(matches!(
            error,
            PersistenceError::ObjectNotFound { ref name, .. } if name == "zzz"
        ));
    }

    #[test]
    fn test_aggregate_merges_grids() {
        let a = Grid2D::rectangle(0.0, 0.0, 1.0, 1.0, 1, 1);
        let b = Grid2D::rectangle(1.0, 0.0, 1.0, 1.0, 1, 1);
        let merged = aggregate(
            Category::Grid2d,
            "vtk",
            vec![Cow::Borrowed(&a), Cow::Borrowed(&b)],
            Some(Grid2D::add_from_grid),
        )
        .unwrap();
        assert_eq!(merged.n_cells(), 2);
        assert_eq!(merged.n_points(), 6);
    }

    #[test]
    fn test_aggregate_single_is_borrowed() {
        let a = Grid3D::default();
        let single = aggregate(Category::Grid3d, "vtk3d", vec![Cow::Borrowed(&a)], None).unwrap();
        assert!(matches!(single, Cow::Borrowed(_)));
    }

    #[test]
    fn test_aggregate_rejects_unmergeable() {
        let a = Grid3D::default();
        let error = aggregate(
            Category::Grid3d,
            "vtk3d",
            vec![Cow::Borrowed(&a), Cow::Borrowed(&a)],
            None,
        )
        .unwrap_err();
        assert!(matches!(
            error,
            PersistenceError::UnsupportedAggregation { count: 2, .. }
        ));

        let empty: Vec<Cow<'_, Grid3D>> = Vec::new();
        assert!(matches!(
            aggregate(Category::Grid3d, "vtk3d", empty, None),
            Err(PersistenceError::EmptySelection { .. })
        ));
    }
}
