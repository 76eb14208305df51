//! Scoped ownership of engine handles.

use std::fmt::Display;
use std::path::Path;

use tracing::{debug, warn};

use crate::engine::Engine;
use crate::error::Result;
use crate::handle::{DocumentHandle, NodeHandle};

/// Owns a document handle and releases it when dropped.
///
/// Consuming methods ([`finalize`](Self::finalize), [`release`](Self::release))
/// hand the handle back to the engine explicitly and surface the engine's
/// result. A guard dropped while still armed (early return, `?`, panic)
/// releases the handle and only logs a failure.
pub struct DocumentGuard<'e> {
    engine: &'e dyn Engine,
    handle: DocumentHandle,
    armed: bool,
}

impl<'e> DocumentGuard<'e> {
    /// Acquire a new, empty writer document.
    pub fn create(engine: &'e dyn Engine) -> Result<Self> {
        let handle = engine.new_document()?;
        debug!(%handle, "created document");
        Ok(Self::adopt(engine, handle))
    }

    /// Open an existing document.
    pub fn open(engine: &'e dyn Engine, path: &Path) -> Result<Self> {
        let handle = engine.open_document(path)?;
        debug!(%handle, path = %path.display(), "opened document");
        Ok(Self::adopt(engine, handle))
    }

    /// Take ownership of a handle acquired elsewhere.
    pub fn adopt(engine: &'e dyn Engine, handle: DocumentHandle) -> Self {
        Self {
            engine,
            handle,
            armed: true,
        }
    }

    pub fn handle(&self) -> DocumentHandle {
        self.handle
    }

    /// Flush the document to `path` and release it.
    pub fn finalize(mut self, path: &Path) -> Result<()> {
        self.armed = false;
        self.engine.finalize_document(self.handle, path)
    }

    /// Release the document without writing it.
    pub fn release(mut self) -> Result<()> {
        self.armed = false;
        self.engine.release_document(self.handle)
    }
}

impl Drop for DocumentGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.armed = false;
            if let Err(error) = self.engine.release_document(self.handle) {
                warn!(handle = %self.handle, %error, "failed to release document");
            }
        }
    }
}

/// Owns the node handles of one category query.
pub struct NodeSet<'e> {
    engine: &'e dyn Engine,
    nodes: Vec<NodeHandle>,
}

impl<'e> NodeSet<'e> {
    /// Query `section` nodes under the document's base.
    pub fn query(engine: &'e dyn Engine, doc: DocumentHandle, section: &str) -> Result<Self> {
        let nodes = engine.query(doc, section)?;
        debug!(%doc, section, count = nodes.len(), "queried nodes");
        Ok(Self { engine, nodes })
    }

    pub fn nodes(&self) -> &[NodeHandle] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Drop for NodeSet<'_> {
    fn drop(&mut self) {
        for node in self.nodes.drain(..) {
            if let Err(error) = self.engine.release_node(node) {
                warn!(%node, %error, "failed to release node");
            }
        }
    }
}

/// Combine the result of an operation with the result of its cleanup step.
///
/// The primary error wins; a cleanup error that would otherwise be lost is
/// logged.
pub fn merge_cleanup<T, E: Display>(
    primary: std::result::Result<T, E>,
    cleanup: std::result::Result<(), E>,
) -> std::result::Result<T, E> {
    match (primary, cleanup) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(error)) | (Err(error), Ok(())) => Err(error),
        (Err(error), Err(cleanup_error)) => {
            warn!(error = %cleanup_error, "cleanup failed after an earlier error");
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{CompositeOptions, ExternalPayload, Named};
    use crate::error::EngineError;
    use crate::progress::ProgressReporter;
    use hm_model::{Contour2D, Grid2D, Grid3D, Surface3D};
    use std::cell::{Cell, RefCell};

    /// Engine that only tracks handles.
    #[derive(Default)]
    struct HandleEngine {
        next: Cell<u64>,
        live_docs: RefCell<Vec<u64>>,
        live_nodes: RefCell<Vec<u64>>,
        fail_release: Cell<bool>,
    }

    impl HandleEngine {
        fn issue(&self) -> u64 {
            let id = self.next.get() + 1;
            self.next.set(id);
            id
        }

        fn unsupported<T>() -> Result<T> {
            Err(EngineError::Unsupported {
                target: "test",
                reason: "not implemented".to_string(),
            })
        }
    }

    impl Engine for HandleEngine {
        fn new_document(&self) -> Result<DocumentHandle> {
            let id = self.issue();
            self.live_docs.borrow_mut().push(id);
            Ok(DocumentHandle::from_raw(id))
        }

        fn open_document(&self, path: &Path) -> Result<DocumentHandle> {
            Err(EngineError::OpenFailure {
                path: path.to_path_buf(),
                reason: "missing".to_string(),
            })
        }

        fn release_document(&self, doc: DocumentHandle) -> Result<()> {
            let mut live = self.live_docs.borrow_mut();
            let position = live
                .iter()
                .position(|&id| id == doc.raw())
                .ok_or(EngineError::UnknownHandle {
                    kind: "document",
                    id: doc.raw(),
                })?;
            live.remove(position);
            if self.fail_release.get() {
                return Self::unsupported();
            }
            Ok(())
        }

        fn finalize_document(&self, doc: DocumentHandle, _path: &Path) -> Result<()> {
            self.release_document(doc)
        }

        fn change_base(&self, _doc: DocumentHandle, _path: &str) -> Result<bool> {
            Ok(false)
        }

        fn purged_string(&self, _doc: DocumentHandle) -> Result<String> {
            Ok(String::new())
        }

        fn query(&self, _doc: DocumentHandle, _section: &str) -> Result<Vec<NodeHandle>> {
            let nodes: Vec<u64> = (0..3).map(|_| self.issue()).collect();
            self.live_nodes.borrow_mut().extend(&nodes);
            Ok(nodes.into_iter().map(NodeHandle::from_raw).collect())
        }

        fn release_node(&self, node: NodeHandle) -> Result<()> {
            self.live_nodes.borrow_mut().retain(|&id| id != node.raw());
            Ok(())
        }

        fn read_contour(&self, _node: NodeHandle) -> Result<Named<Contour2D>> {
            Self::unsupported()
        }

        fn read_grid2d(&self, _node: NodeHandle) -> Result<Named<Grid2D>> {
            Self::unsupported()
        }

        fn read_grid3d(
            &self,
            _node: NodeHandle,
            _progress: ProgressReporter<'_>,
        ) -> Result<Named<Grid3D>> {
            Self::unsupported()
        }

        fn read_surface3d(&self, _node: NodeHandle) -> Result<Named<Surface3D>> {
            Self::unsupported()
        }

        fn write_contours(
            &self,
            _doc: DocumentHandle,
            _objects: &[(&str, &Contour2D)],
            _options: &CompositeOptions<'_>,
        ) -> Result<()> {
            Self::unsupported()
        }

        fn write_grids2d(
            &self,
            _doc: DocumentHandle,
            _objects: &[(&str, &Grid2D)],
            _options: &CompositeOptions<'_>,
        ) -> Result<()> {
            Self::unsupported()
        }

        fn write_grids3d(
            &self,
            _doc: DocumentHandle,
            _objects: &[(&str, &Grid3D)],
            _options: &CompositeOptions<'_>,
            _progress: ProgressReporter<'_>,
        ) -> Result<()> {
            Self::unsupported()
        }

        fn write_surfaces3d(
            &self,
            _doc: DocumentHandle,
            _objects: &[(&str, &Surface3D)],
            _options: &CompositeOptions<'_>,
        ) -> Result<()> {
            Self::unsupported()
        }

        fn write_external(
            &self,
            _payload: ExternalPayload<'_>,
            _path: &Path,
            _progress: ProgressReporter<'_>,
        ) -> Result<()> {
            Self::unsupported()
        }
    }

    fn failing_step(guard: &DocumentGuard<'_>) -> Result<()> {
        let _ = guard.handle();
        Err(EngineError::Cancelled)
    }

    #[test]
    fn test_guard_releases_on_error_path() {
        let engine = HandleEngine::default();
        let outcome = (|| -> Result<()> {
            let guard = DocumentGuard::create(&engine)?;
            failing_step(&guard)?;
            guard.release()
        })();
        assert!(matches!(outcome, Err(EngineError::Cancelled)));
        assert!(engine.live_docs.borrow().is_empty());
    }

    #[test]
    fn test_finalize_consumes_guard() {
        let engine = HandleEngine::default();
        let guard = DocumentGuard::create(&engine).unwrap();
        guard.finalize(Path::new("unused.hmp")).unwrap();
        assert!(engine.live_docs.borrow().is_empty());
    }

    #[test]
    fn test_open_failure_acquires_nothing() {
        let engine = HandleEngine::default();
        let err = DocumentGuard::open(&engine, Path::new("missing.hmp")).err();
        assert!(matches!(err, Some(EngineError::OpenFailure { .. })));
        assert!(engine.live_docs.borrow().is_empty());
    }

    #[test]
    fn test_drop_logs_release_failure() {
        let engine = HandleEngine::default();
        {
            let _guard = DocumentGuard::create(&engine).unwrap();
            engine.fail_release.set(true);
        }
        assert!(engine.live_docs.borrow().is_empty());
    }

    #[test]
    fn test_node_set_releases_all_nodes() {
        let engine = HandleEngine::default();
        let doc = DocumentGuard::create(&engine).unwrap();
        {
            let nodes = NodeSet::query(&engine, doc.handle(), "GRID2D").unwrap();
            assert_eq!(nodes.len(), 3);
            assert_eq!(engine.live_nodes.borrow().len(), 3);
        }
        assert!(engine.live_nodes.borrow().is_empty());
        doc.release().unwrap();
    }

    #[test]
    fn test_merge_cleanup_prefers_primary_error() {
        let primary: std::result::Result<u8, String> = Err("primary".into());
        let merged = merge_cleanup(primary, Err("cleanup".into()));
        assert_eq!(merged, Err("primary".to_string()));

        let merged = merge_cleanup(Ok(7u8), Err::<(), String>("cleanup".into()));
        assert_eq!(merged, Err("cleanup".to_string()));

        assert_eq!(merge_cleanup::<u8, String>(Ok(7), Ok(())), Ok(7));
    }
}
