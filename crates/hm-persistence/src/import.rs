//! Import Aggregator.
//!
//! Reads every object below a document's base, category by category, and
//! hands them back in document order.

use std::path::Path;

use hm_engine::{
    DocumentGuard, DocumentHandle, Engine, Named, NodeSet, ProgressReporter, STATE_PATH,
    merge_cleanup,
};
use hm_model::{BoundaryTypes, Category, Contour2D, Framework, Grid2D, Grid3D, Surface3D};
use tracing::{debug, info};

use crate::error::{PersistenceError, Result};

/// Objects read from a document, per category in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedObjects {
    pub contours: Vec<Named<Contour2D>>,
    pub grids2d: Vec<Named<Grid2D>>,
    pub grids3d: Vec<Named<Grid3D>>,
    pub surfaces3d: Vec<Named<Surface3D>>,
}

impl ImportedObjects {
    /// Total number of objects.
    pub fn len(&self) -> usize {
        self.contours.len() + self.grids2d.len() + self.grids3d.len() + self.surfaces3d.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build a project model from the imported objects.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::DuplicateName`] if two objects of one
    /// category share a name.
    pub fn into_framework(self, boundary_types: BoundaryTypes) -> Result<Framework> {
        let mut framework = Framework::new();
        framework.boundary_types = boundary_types;
        for Named { name, object } in self.contours {
            framework.add_contour(name, object)?;
        }
        for Named { name, object } in self.grids2d {
            framework.add_grid2d(name, object)?;
        }
        for Named { name, object } in self.grids3d {
            framework.add_grid3d(name, object)?;
        }
        for Named { name, object } in self.surfaces3d {
            framework.add_surface3d(name, object)?;
        }
        Ok(framework)
    }
}

/// Read all objects below the base of `doc`.
///
/// The reporter's range is split into `n + 3` equal slots for `n` 3D
/// grids: contours, 2D grids, one slot per 3D grid (handed to the engine)
/// and surfaces. Node handles are released on every path.
pub fn import_all(
    engine: &dyn Engine,
    doc: DocumentHandle,
    reporter: ProgressReporter<'_>,
) -> Result<ImportedObjects> {
    reporter.report("Loading xml file", "", 0.0, false)?;
    let grid_nodes = NodeSet::query(engine, doc, Category::Grid2d.section())?;
    let contour_nodes = NodeSet::query(engine, doc, Category::Contour.section())?;
    let grid3d_nodes = NodeSet::query(engine, doc, Category::Grid3d.section())?;
    let surface_nodes = NodeSet::query(engine, doc, Category::Surface3d.section())?;

    let total = grid3d_nodes.len() + 3;
    let mut imported = ImportedObjects::default();

    reporter
        .subdivide(0, total)
        .report("Reading contours", "", 0.0, false)?;
    for &node in contour_nodes.nodes() {
        imported.contours.push(engine.read_contour(node)?);
    }

    reporter
        .subdivide(1, total)
        .report("Reading grids", "", 0.0, false)?;
    for &node in grid_nodes.nodes() {
        imported.grids2d.push(engine.read_grid2d(node)?);
    }

    for (index, &node) in grid3d_nodes.nodes().iter().enumerate() {
        let grid = engine.read_grid3d(node, reporter.subdivide(2 + index, total))?;
        debug!(name = %grid.name, cells = grid.object.n_cells(), "read 3D grid");
        imported.grids3d.push(grid);
    }

    reporter
        .subdivide(total - 1, total)
        .report("Reading surfaces", "", 0.0, false)?;
    for &node in surface_nodes.nodes() {
        imported.surfaces3d.push(engine.read_surface3d(node)?);
    }

    debug!(
        contours = imported.contours.len(),
        grids2d = imported.grids2d.len(),
        grids3d = imported.grids3d.len(),
        surfaces = imported.surfaces3d.len(),
        "imported objects"
    );
    Ok(imported)
}

/// Read all objects of a native document at `path`.
///
/// Project files are read from their `FLOW/STATE` section; standalone
/// exports (`hmg`, `hmc`, `hms`, `hmg3d`) from the document root.
pub fn import_objects(
    engine: &dyn Engine,
    path: &Path,
    reporter: ProgressReporter<'_>,
) -> Result<ImportedObjects> {
    let reader = DocumentGuard::open(engine, path)?;
    let imported = engine
        .change_base(reader.handle(), STATE_PATH)
        .map_err(PersistenceError::from)
        .and_then(|in_project| {
            debug!(in_project, "reading objects");
            import_all(engine, reader.handle(), reporter)
        });
    let imported = merge_cleanup(imported, reader.release().map_err(PersistenceError::from))?;
    info!(count = imported.len(), "Imported objects from {}", path.display());
    Ok(imported)
}
