//! In-memory XML document engine.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

use hm_engine::tree::Element;
use hm_engine::{
    CompositeOptions, DocumentHandle, Engine, EngineError, ExternalPayload, Named, NodeHandle,
    ProgressReporter, ROOT_TAG, Result,
};
use hm_model::{Category, Contour2D, Grid2D, Grid3D, Surface3D};
use tracing::{debug, trace};

use crate::codec;
use crate::export;

struct XmlDocument {
    root: Element,
    /// Child indices from the root to the base element.
    base: Vec<usize>,
}

struct NodeRef {
    doc: u64,
    /// Child indices from the root to the node element.
    path: Vec<usize>,
}

#[derive(Default)]
struct HandleTable {
    next_id: u64,
    documents: HashMap<u64, XmlDocument>,
    nodes: HashMap<u64, NodeRef>,
}

impl HandleTable {
    fn issue(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn document(&self, doc: DocumentHandle) -> Result<&XmlDocument> {
        self.documents
            .get(&doc.raw())
            .ok_or(EngineError::UnknownHandle {
                kind: "document",
                id: doc.raw(),
            })
    }

    fn document_mut(&mut self, doc: DocumentHandle) -> Result<&mut XmlDocument> {
        self.documents
            .get_mut(&doc.raw())
            .ok_or(EngineError::UnknownHandle {
                kind: "document",
                id: doc.raw(),
            })
    }

    /// Copy of the element behind a node handle.
    fn node_element(&self, node: NodeHandle) -> Result<Element> {
        let unknown = EngineError::UnknownHandle {
            kind: "node",
            id: node.raw(),
        };
        let node_ref = self.nodes.get(&node.raw()).ok_or(unknown)?;
        let document = self.documents.get(&node_ref.doc).ok_or_else(|| {
            EngineError::UnknownHandle {
                kind: "document",
                id: node_ref.doc,
            }
        })?;
        document
            .root
            .at(&node_ref.path)
            .cloned()
            .ok_or_else(|| EngineError::malformed("node", "element no longer exists"))
    }
}

/// Reference [`Engine`] keeping every open document as an element tree.
///
/// Documents live in memory until finalized; node handles address elements
/// by their child-index path, which stays valid because writes only append.
#[derive(Default)]
pub struct XmlEngine {
    state: RefCell<HandleTable>,
}

impl XmlEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents not yet released.
    pub fn open_documents(&self) -> usize {
        self.state.borrow().documents.len()
    }

    /// Number of node handles not yet released.
    pub fn open_nodes(&self) -> usize {
        self.state.borrow().nodes.len()
    }

    fn insert_document(&self, root: Element) -> DocumentHandle {
        let mut state = self.state.borrow_mut();
        let id = state.issue();
        state.documents.insert(
            id,
            XmlDocument {
                root,
                base: Vec::new(),
            },
        );
        DocumentHandle::from_raw(id)
    }

    /// Append encoded elements under the document's base.
    fn append(&self, doc: DocumentHandle, elements: Vec<Element>) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let document = state.document_mut(doc)?;
        let base = document.base.clone();
        let parent = document
            .root
            .at_mut(&base)
            .ok_or_else(|| EngineError::malformed("document", "base element is missing"))?;
        trace!(%doc, count = elements.len(), "appending elements");
        parent.children.extend(elements);
        Ok(())
    }

    fn write_composite<T>(
        &self,
        doc: DocumentHandle,
        objects: &[(&str, &T)],
        options: &CompositeOptions<'_>,
        encode: fn(&str, &T, &CompositeOptions<'_>) -> Element,
    ) -> Result<()> {
        let elements = objects
            .iter()
            .map(|(name, object)| encode(name, object, options))
            .collect();
        self.append(doc, elements)
    }
}

fn purge_geometry(element: &mut Element) {
    element
        .children
        .retain(|child| !Category::ALL.iter().any(|c| c.section() == child.name));
    for child in &mut element.children {
        purge_geometry(child);
    }
}

impl Engine for XmlEngine {
    fn new_document(&self) -> Result<DocumentHandle> {
        Ok(self.insert_document(Element::new(ROOT_TAG)))
    }

    fn open_document(&self, path: &Path) -> Result<DocumentHandle> {
        let root = Element::read_file(path)?;
        if root.name != ROOT_TAG {
            debug!(root = %root.name, path = %path.display(), "opened foreign document");
        }
        Ok(self.insert_document(root))
    }

    fn release_document(&self, doc: DocumentHandle) -> Result<()> {
        self.state
            .borrow_mut()
            .documents
            .remove(&doc.raw())
            .map(|_| ())
            .ok_or(EngineError::UnknownHandle {
                kind: "document",
                id: doc.raw(),
            })
    }

    fn finalize_document(&self, doc: DocumentHandle, path: &Path) -> Result<()> {
        let document = self
            .state
            .borrow_mut()
            .documents
            .remove(&doc.raw())
            .ok_or(EngineError::UnknownHandle {
                kind: "document",
                id: doc.raw(),
            })?;
        document.root.write_file(path)?;
        debug!(%doc, path = %path.display(), "document written");
        Ok(())
    }

    fn change_base(&self, doc: DocumentHandle, path: &str) -> Result<bool> {
        let mut state = self.state.borrow_mut();
        let document = state.document_mut(doc)?;
        match document.root.path_indices(path) {
            Some(indices) => {
                document.base = indices;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn purged_string(&self, doc: DocumentHandle) -> Result<String> {
        let mut root = self.state.borrow().document(doc)?.root.clone();
        purge_geometry(&mut root);
        root.to_xml()
    }

    fn query(&self, doc: DocumentHandle, section: &str) -> Result<Vec<NodeHandle>> {
        let mut state = self.state.borrow_mut();
        let document = state.document(doc)?;
        let base = document.base.clone();
        let indices: Vec<usize> = document
            .root
            .at(&base)
            .map(|parent| {
                parent
                    .children
                    .iter()
                    .enumerate()
                    .filter(|(_, child)| child.name == section)
                    .map(|(i, _)| i)
                    .collect()
            })
            .unwrap_or_default();

        let mut handles = Vec::with_capacity(indices.len());
        for index in indices {
            let id = state.issue();
            let mut path = base.clone();
            path.push(index);
            state.nodes.insert(
                id,
                NodeRef {
                    doc: doc.raw(),
                    path,
                },
            );
            handles.push(NodeHandle::from_raw(id));
        }
        Ok(handles)
    }

    fn release_node(&self, node: NodeHandle) -> Result<()> {
        self.state
            .borrow_mut()
            .nodes
            .remove(&node.raw())
            .map(|_| ())
            .ok_or(EngineError::UnknownHandle {
                kind: "node",
                id: node.raw(),
            })
    }

    fn read_contour(&self, node: NodeHandle) -> Result<Named<Contour2D>> {
        let element = self.state.borrow().node_element(node)?;
        codec::contour::decode(&element)
    }

    fn read_grid2d(&self, node: NodeHandle) -> Result<Named<Grid2D>> {
        let element = self.state.borrow().node_element(node)?;
        codec::grid2d::decode(&element)
    }

    fn read_grid3d(
        &self,
        node: NodeHandle,
        progress: ProgressReporter<'_>,
    ) -> Result<Named<Grid3D>> {
        let element = self.state.borrow().node_element(node)?;
        codec::grid3d::decode(&element, progress)
    }

    fn read_surface3d(&self, node: NodeHandle) -> Result<Named<Surface3D>> {
        let element = self.state.borrow().node_element(node)?;
        codec::surface::decode(&element)
    }

    fn write_contours(
        &self,
        doc: DocumentHandle,
        objects: &[(&str, &Contour2D)],
        options: &CompositeOptions<'_>,
    ) -> Result<()> {
        self.write_composite(doc, objects, options, codec::contour::encode)
    }

    fn write_grids2d(
        &self,
        doc: DocumentHandle,
        objects: &[(&str, &Grid2D)],
        options: &CompositeOptions<'_>,
    ) -> Result<()> {
        self.write_composite(doc, objects, options, codec::grid2d::encode)
    }

    fn write_grids3d(
        &self,
        doc: DocumentHandle,
        objects: &[(&str, &Grid3D)],
        options: &CompositeOptions<'_>,
        progress: ProgressReporter<'_>,
    ) -> Result<()> {
        let mut elements = Vec::with_capacity(objects.len());
        for (index, (name, grid)) in objects.iter().enumerate() {
            progress
                .subdivide(index, objects.len())
                .report("Writing 3d grid", name, 0.0, false)?;
            elements.push(codec::grid3d::encode(name, grid, options));
        }
        self.append(doc, elements)
    }

    fn write_surfaces3d(
        &self,
        doc: DocumentHandle,
        objects: &[(&str, &Surface3D)],
        options: &CompositeOptions<'_>,
    ) -> Result<()> {
        self.write_composite(doc, objects, options, codec::surface::encode)
    }

    fn write_external(
        &self,
        payload: ExternalPayload<'_>,
        path: &Path,
        progress: ProgressReporter<'_>,
    ) -> Result<()> {
        export::write_payload(payload, path, progress)
    }
}
