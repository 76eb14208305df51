//! The engine trait.

use std::path::Path;

use hm_model::{BoundaryTypes, Contour2D, Grid2D, Grid3D, Surface3D};

use crate::error::Result;
use crate::handle::{DocumentHandle, NodeHandle};
use crate::options::{AuxField, Encoding, PeriodicCondition2d, PeriodicCondition3d};
use crate::progress::ProgressReporter;
use crate::target::{ContourTarget, Grid2dTarget, Grid3dTarget, SurfaceTarget};

/// An object decoded from a document node together with its stored name.
#[derive(Debug, Clone, PartialEq)]
pub struct Named<T> {
    pub name: String,
    pub object: T,
}

impl<T> Named<T> {
    pub fn new(name: impl Into<String>, object: T) -> Self {
        Self {
            name: name.into(),
            object,
        }
    }
}

/// Options for writing objects into a native document.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompositeOptions<'a> {
    pub encoding: Encoding,
    pub aux_fields: &'a [AuxField],
}

/// A single object bound for an external file.
#[derive(Debug, Clone, Copy)]
pub enum ExternalPayload<'a> {
    Contour {
        contour: &'a Contour2D,
        target: ContourTarget,
        boundary_types: &'a BoundaryTypes,
    },
    Grid2d {
        grid: &'a Grid2D,
        target: Grid2dTarget,
        boundary_types: &'a BoundaryTypes,
        periodic: &'a [PeriodicCondition2d],
    },
    Grid3d {
        grid: &'a Grid3D,
        target: Grid3dTarget,
        boundary_types: &'a BoundaryTypes,
        periodic: &'a [PeriodicCondition3d],
    },
    Surface {
        surface: &'a Surface3D,
        target: SurfaceTarget,
    },
}

impl ExternalPayload<'_> {
    /// Format id of the payload's target, for logging.
    pub fn target_name(&self) -> &'static str {
        match self {
            Self::Contour { target, .. } => target.name(),
            Self::Grid2d { target, .. } => target.name(),
            Self::Grid3d { target, .. } => target.name(),
            Self::Surface { target, .. } => target.name(),
        }
    }
}

/// Document and geometry services used by the persistence layer.
///
/// Handles returned by [`new_document`](Engine::new_document),
/// [`open_document`](Engine::open_document) and [`query`](Engine::query)
/// are owned by the caller and must be released exactly once; see
/// [`DocumentGuard`](crate::DocumentGuard) and [`NodeSet`](crate::NodeSet).
///
/// All methods take `&self`. Implementations keep their handle tables behind
/// interior mutability and are used from a single thread.
pub trait Engine {
    /// Create an empty writer document rooted at `HybMeshData`.
    fn new_document(&self) -> Result<DocumentHandle>;

    /// Parse an existing document.
    ///
    /// # Errors
    ///
    /// [`EngineError::OpenFailure`](crate::EngineError::OpenFailure) when
    /// the file is missing or not a well-formed document.
    fn open_document(&self, path: &Path) -> Result<DocumentHandle>;

    fn release_document(&self, doc: DocumentHandle) -> Result<()>;

    /// Write the document to `path` and release it.
    ///
    /// The handle is released even when writing fails.
    fn finalize_document(&self, doc: DocumentHandle, path: &Path) -> Result<()>;

    /// Move the document's base element to `path` (slash separated, relative
    /// to the root). Returns `false` and leaves the base unchanged when the
    /// path does not exist.
    fn change_base(&self, doc: DocumentHandle, path: &str) -> Result<bool>;

    /// Serialize the whole document with all geometry elements removed.
    fn purged_string(&self, doc: DocumentHandle) -> Result<String>;

    /// Nodes of one category directly under the document's base, in
    /// document order.
    fn query(&self, doc: DocumentHandle, section: &str) -> Result<Vec<NodeHandle>>;

    fn release_node(&self, node: NodeHandle) -> Result<()>;

    fn read_contour(&self, node: NodeHandle) -> Result<Named<Contour2D>>;

    fn read_grid2d(&self, node: NodeHandle) -> Result<Named<Grid2D>>;

    /// Reconstruct a 3D grid, reporting progress into `progress`.
    fn read_grid3d(&self, node: NodeHandle, progress: ProgressReporter<'_>)
    -> Result<Named<Grid3D>>;

    fn read_surface3d(&self, node: NodeHandle) -> Result<Named<Surface3D>>;

    /// Append named contours under the document's base.
    fn write_contours(
        &self,
        doc: DocumentHandle,
        objects: &[(&str, &Contour2D)],
        options: &CompositeOptions<'_>,
    ) -> Result<()>;

    fn write_grids2d(
        &self,
        doc: DocumentHandle,
        objects: &[(&str, &Grid2D)],
        options: &CompositeOptions<'_>,
    ) -> Result<()>;

    fn write_grids3d(
        &self,
        doc: DocumentHandle,
        objects: &[(&str, &Grid3D)],
        options: &CompositeOptions<'_>,
        progress: ProgressReporter<'_>,
    ) -> Result<()>;

    fn write_surfaces3d(
        &self,
        doc: DocumentHandle,
        objects: &[(&str, &Surface3D)],
        options: &CompositeOptions<'_>,
    ) -> Result<()>;

    /// Write one object to an external file format.
    fn write_external(
        &self,
        payload: ExternalPayload<'_>,
        path: &Path,
        progress: ProgressReporter<'_>,
    ) -> Result<()>;
}
