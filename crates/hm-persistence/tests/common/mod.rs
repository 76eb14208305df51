//! Shared fixtures for persistence integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::fmt::Write as _;
use std::path::Path;

use hm_engine::{
    CompositeOptions, DocumentHandle, Engine, EngineError, ExternalPayload, Named, NodeHandle,
    ProgressEvent, ProgressReporter, ProgressSink, Result,
};
use hm_hmxml::XmlEngine;
use hm_model::{
    Contour2D, Framework, Grid2D, Grid3D, GridFace, Point2, Point3, Surface3D, SurfaceFace,
};

/// Reference engine that counts handle traffic and can fail one call.
#[derive(Default)]
pub struct CountingEngine {
    inner: XmlEngine,
    documents_acquired: Cell<usize>,
    documents_released: Cell<usize>,
    nodes_acquired: Cell<usize>,
    nodes_released: Cell<usize>,
    fail_on: Option<&'static str>,
}

impl CountingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine whose `call` fails with a malformed-document error.
    pub fn failing_on(call: &'static str) -> Self {
        Self {
            fail_on: Some(call),
            ..Self::default()
        }
    }

    pub fn documents_acquired(&self) -> usize {
        self.documents_acquired.get()
    }

    pub fn nodes_acquired(&self) -> usize {
        self.nodes_acquired.get()
    }

    /// Every handle handed out was given back exactly once.
    pub fn assert_balanced(&self) {
        assert_eq!(
            self.documents_acquired.get(),
            self.documents_released.get(),
            "document acquire/release mismatch"
        );
        assert_eq!(
            self.nodes_acquired.get(),
            self.nodes_released.get(),
            "node acquire/release mismatch"
        );
        assert_eq!(self.inner.open_documents(), 0, "documents left open");
        assert_eq!(self.inner.open_nodes(), 0, "nodes left open");
    }

    pub fn open_documents(&self) -> usize {
        self.inner.open_documents()
    }

    fn check(&self, call: &'static str) -> Result<()> {
        if self.fail_on == Some(call) {
            return Err(EngineError::malformed(call, "injected failure"));
        }
        Ok(())
    }

    fn bump(counter: &Cell<usize>, by: usize) {
        counter.set(counter.get() + by);
    }
}

impl Engine for CountingEngine {
    fn new_document(&self) -> Result<DocumentHandle> {
        self.check("new_document")?;
        let doc = self.inner.new_document()?;
        Self::bump(&self.documents_acquired, 1);
        Ok(doc)
    }

    fn open_document(&self, path: &Path) -> Result<DocumentHandle> {
        self.check("open_document")?;
        let doc = self.inner.open_document(path)?;
        Self::bump(&self.documents_acquired, 1);
        Ok(doc)
    }

    fn release_document(&self, doc: DocumentHandle) -> Result<()> {
        Self::bump(&self.documents_released, 1);
        self.inner.release_document(doc)
    }

    fn finalize_document(&self, doc: DocumentHandle, path: &Path) -> Result<()> {
        Self::bump(&self.documents_released, 1);
        if let Err(error) = self.check("finalize_document") {
            self.inner.release_document(doc)?;
            return Err(error);
        }
        self.inner.finalize_document(doc, path)
    }

    fn change_base(&self, doc: DocumentHandle, path: &str) -> Result<bool> {
        self.check("change_base")?;
        self.inner.change_base(doc, path)
    }

    fn purged_string(&self, doc: DocumentHandle) -> Result<String> {
        self.check("purged_string")?;
        self.inner.purged_string(doc)
    }

    fn query(&self, doc: DocumentHandle, section: &str) -> Result<Vec<NodeHandle>> {
        self.check("query")?;
        let nodes = self.inner.query(doc, section)?;
        Self::bump(&self.nodes_acquired, nodes.len());
        Ok(nodes)
    }

    fn release_node(&self, node: NodeHandle) -> Result<()> {
        Self::bump(&self.nodes_released, 1);
        self.inner.release_node(node)
    }

    fn read_contour(&self, node: NodeHandle) -> Result<Named<Contour2D>> {
        self.check("read_contour")?;
        self.inner.read_contour(node)
    }

    fn read_grid2d(&self, node: NodeHandle) -> Result<Named<Grid2D>> {
        self.check("read_grid2d")?;
        self.inner.read_grid2d(node)
    }

    fn read_grid3d(
        &self,
        node: NodeHandle,
        progress: ProgressReporter<'_>,
    ) -> Result<Named<Grid3D>> {
        self.check("read_grid3d")?;
        self.inner.read_grid3d(node, progress)
    }

    fn read_surface3d(&self, node: NodeHandle) -> Result<Named<Surface3D>> {
        self.check("read_surface3d")?;
        self.inner.read_surface3d(node)
    }

    fn write_contours(
        &self,
        doc: DocumentHandle,
        objects: &[(&str, &Contour2D)],
        options: &CompositeOptions<'_>,
    ) -> Result<()> {
        self.check("write_contours")?;
        self.inner.write_contours(doc, objects, options)
    }

    fn write_grids2d(
        &self,
        doc: DocumentHandle,
        objects: &[(&str, &Grid2D)],
        options: &CompositeOptions<'_>,
    ) -> Result<()> {
        self.check("write_grids2d")?;
        self.inner.write_grids2d(doc, objects, options)
    }

    fn write_grids3d(
        &self,
        doc: DocumentHandle,
        objects: &[(&str, &Grid3D)],
        options: &CompositeOptions<'_>,
        progress: ProgressReporter<'_>,
    ) -> Result<()> {
        self.check("write_grids3d")?;
        self.inner.write_grids3d(doc, objects, options, progress)
    }

    fn write_surfaces3d(
        &self,
        doc: DocumentHandle,
        objects: &[(&str, &Surface3D)],
        options: &CompositeOptions<'_>,
    ) -> Result<()> {
        self.check("write_surfaces3d")?;
        self.inner.write_surfaces3d(doc, objects, options)
    }

    fn write_external(
        &self,
        payload: ExternalPayload<'_>,
        path: &Path,
        progress: ProgressReporter<'_>,
    ) -> Result<()> {
        self.check("write_external")?;
        self.inner.write_external(payload, path, progress)
    }
}

/// A recorded progress event.
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub stage: String,
    pub detail: String,
    pub fraction: f64,
    pub is_final: bool,
}

/// Sink recording every event; optionally cancels once a stage was seen.
#[derive(Default)]
pub struct RecordingSink {
    events: RefCell<Vec<Recorded>>,
    cancel_after: Option<&'static str>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation right after the first event of `stage`.
    pub fn cancelling_after(stage: &'static str) -> Self {
        Self {
            cancel_after: Some(stage),
            ..Self::default()
        }
    }

    pub fn reporter(&self) -> ProgressReporter<'_> {
        ProgressReporter::new(self)
    }

    pub fn events(&self) -> Vec<Recorded> {
        self.events.borrow().clone()
    }

    pub fn stages(&self) -> Vec<String> {
        self.events.borrow().iter().map(|e| e.stage.clone()).collect()
    }

    /// One line per event: stage, optional detail, fraction, final marker.
    pub fn transcript(&self) -> String {
        let mut out = String::new();
        for event in self.events.borrow().iter() {
            let _ = write!(out, "{}", event.stage);
            if !event.detail.is_empty() {
                let _ = write!(out, " [{}]", event.detail);
            }
            let _ = write!(out, " {:.3}", event.fraction);
            if event.is_final {
                out.push_str(" final");
            }
            out.push('\n');
        }
        out
    }

    /// Fractions stay in `[0, 1]`, never decrease, and end with a final 1.
    pub fn assert_well_formed(&self) {
        let events = self.events.borrow();
        let mut last = 0.0;
        for event in events.iter() {
            assert!(
                (0.0..=1.0).contains(&event.fraction),
                "{} out of range: {}",
                event.stage,
                event.fraction
            );
            assert!(
                event.fraction >= last,
                "{} went back from {last} to {}",
                event.stage,
                event.fraction
            );
            last = event.fraction;
        }
        let final_event = events.last().expect("at least one event");
        assert!(final_event.is_final);
        assert_eq!(final_event.fraction, 1.0);
    }
}

impl ProgressSink for RecordingSink {
    fn on_progress(&self, event: &ProgressEvent<'_>) {
        self.events.borrow_mut().push(Recorded {
            stage: event.stage.to_string(),
            detail: event.detail.to_string(),
            fraction: event.fraction,
            is_final: event.is_final,
        });
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_after
            .is_some_and(|stage| self.events.borrow().iter().any(|e| e.stage == stage))
    }
}

pub fn triangle_contour() -> Contour2D {
    Contour2D::closed_polygon(
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.5, 0.75),
        ],
        1,
    )
}

/// Unit square grid with typed bottom (1) and top (2) edges.
pub fn typed_square(x0: f64, n: usize) -> Grid2D {
    let mut grid = Grid2D::rectangle(x0, 0.0, 1.0, 1.0, n, n);
    for i in 0..n {
        grid.set_boundary_type(i, i + 1, 1);
        let top = n * (n + 1) + i;
        grid.set_boundary_type(top, top + 1, 2);
    }
    grid
}

pub fn two_tetrahedra() -> Grid3D {
    Grid3D::new(
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
        ],
        vec![
            GridFace::new(vec![0, 2, 1], Some(0), None, 1),
            GridFace::new(vec![0, 1, 3], Some(0), None, 2),
            GridFace::new(vec![0, 3, 2], Some(0), None, 2),
            GridFace::new(vec![1, 2, 3], Some(0), Some(1), 0),
            GridFace::new(vec![1, 4, 2], Some(1), None, 3),
            GridFace::new(vec![2, 4, 3], Some(1), None, 3),
            GridFace::new(vec![1, 3, 4], Some(1), None, 3),
        ],
        2,
    )
}

pub fn unit_quad_surface() -> Surface3D {
    Surface3D::new(
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ],
        vec![SurfaceFace::new(vec![0, 1, 2, 3], 4)],
    )
}

/// Project with one object of every category, two 2D grids and named
/// boundary types.
pub fn sample_framework() -> Framework {
    let mut framework = Framework::new();
    framework.add_contour("c1", triangle_contour()).unwrap();
    framework.add_grid2d("g1", typed_square(0.0, 2)).unwrap();
    framework.add_grid2d("g2", typed_square(1.0, 1)).unwrap();
    framework.add_grid3d("vol", two_tetrahedra()).unwrap();
    framework.add_surface3d("s1", unit_quad_surface()).unwrap();
    framework.boundary_types.insert(1, "bottom");
    framework.boundary_types.insert(2, "top");
    framework.boundary_types.insert(3, "outer");
    framework
}
