//! Integration tests for project save and load.

mod common;

use common::{CountingEngine, RecordingSink, sample_framework, typed_square};
use hm_engine::tree::Element;
use hm_engine::{Encoding, EngineError, ProgressReporter};
use hm_model::Category;
use hm_persistence::{
    CommandRecord, PersistenceError, ProjectFile, load_project, load_project_into, save_project,
};
use serde_json::json;
use tempfile::tempdir;

fn sample_project() -> ProjectFile {
    let mut project = ProjectFile::new(sample_framework());
    project
        .history
        .push(CommandRecord::new("AddRectGrid", json!({"p0": [0.0, 0.0], "nx": 2})));
    project
        .history
        .push(CommandRecord::new("RenameGeom", json!({"old": "Grid1", "new": "g1"})));
    project
}

#[test]
fn round_trip_in_both_encodings() {
    let dir = tempdir().unwrap();
    for encoding in [Encoding::Ascii, Encoding::Binary] {
        let path = dir.path().join(format!("project-{encoding}.hmp"));
        let engine = CountingEngine::new();
        let mut project = sample_project();

        save_project(&engine, &mut project, &path, encoding, ProgressReporter::silent()).unwrap();
        let loaded = load_project(&engine, &path, ProgressReporter::silent()).unwrap();

        assert_eq!(loaded, project, "{encoding}");
        assert_eq!(loaded.framework.names(Category::Grid2d), ["g1", "g2"]);
        engine.assert_balanced();
    }
}

#[test]
fn empty_project_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.hmp");
    let engine = CountingEngine::new();
    let mut project = ProjectFile::default();

    save_project(&engine, &mut project, &path, Encoding::Ascii, ProgressReporter::silent())
        .unwrap();
    let loaded = load_project(&engine, &path, ProgressReporter::silent()).unwrap();

    assert_eq!(loaded, project);
    assert!(loaded.framework.is_empty());
    engine.assert_balanced();
}

#[test]
fn save_progress_stages() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("progress.hmp");
    let engine = CountingEngine::new();
    let sink = RecordingSink::new();

    save_project(&engine, &mut sample_project(), &path, Encoding::Ascii, sink.reporter()).unwrap();

    sink.assert_well_formed();
    insta::assert_snapshot!(sink.transcript(), @r"
    Write contours 0.000
    Write grids 0.100
    Write grids 3d 0.300
    Writing 3d grid [vol] 0.300
    Write surfaces 0.600
    Save to file 0.800
    Done 1.000 final
    ");
}

#[test]
fn load_progress_stages() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("progress.hmp");
    let engine = CountingEngine::new();
    save_project(
        &engine,
        &mut sample_project(),
        &path,
        Encoding::Binary,
        ProgressReporter::silent(),
    )
    .unwrap();

    let sink = RecordingSink::new();
    load_project(&engine, &path, sink.reporter()).unwrap();

    sink.assert_well_formed();
    insta::assert_snapshot!(sink.transcript(), @r"
    Loading xml file 0.000
    Reading contours 0.000
    Reading grids 0.250
    Reading vertices [vol] 0.500
    Reading faces [vol] 0.575
    Assembling cells [vol] 0.675
    Grid ready [vol] 0.750
    Reading surfaces 0.750
    Done 1.000 final
    ");
}

#[test]
fn missing_file_is_open_failure() {
    let dir = tempdir().unwrap();
    let engine = CountingEngine::new();
    let result = load_project(&engine, &dir.path().join("nope.hmp"), ProgressReporter::silent());
    assert!(matches!(result, Err(PersistenceError::OpenFailure { .. })));
    assert_eq!(engine.documents_acquired(), 0);
}

#[test]
fn document_without_flow_has_no_project_data() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("grid.hmg");
    Element::new("HybMeshData")
        .with_child(Element::new("GRID2D").with_attribute("name", "g"))
        .write_file(&path)
        .unwrap();

    let engine = CountingEngine::new();
    let result = load_project(&engine, &path, ProgressReporter::silent());
    assert!(matches!(result, Err(PersistenceError::NoProjectData { .. })));
    engine.assert_balanced();
}

#[test]
fn foreign_root_has_no_project_data() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("other.xml");
    Element::new("Other")
        .with_child(Element::new("FLOW").with_child(Element::new("STATE")))
        .write_file(&path)
        .unwrap();

    let engine = CountingEngine::new();
    let result = load_project(&engine, &path, ProgressReporter::silent());
    assert!(matches!(result, Err(PersistenceError::NoProjectData { .. })));
    engine.assert_balanced();
}

#[test]
fn overflowing_counts_fail_the_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("huge.hmp");
    let engine = CountingEngine::new();
    save_project(
        &engine,
        &mut sample_project(),
        &path,
        Encoding::Ascii,
        ProgressReporter::silent(),
    )
    .unwrap();

    let mut root = Element::read_file(&path).unwrap();
    let count = root.find_mut("FLOW/STATE/GRID2D/N_VERTICES").unwrap();
    count.text = usize::MAX.to_string();
    root.write_file(&path).unwrap();

    let result = load_project(&engine, &path, ProgressReporter::silent());
    assert!(matches!(
        result,
        Err(PersistenceError::Engine(EngineError::Malformed { .. }))
    ));
    engine.assert_balanced();
}

#[test]
fn missing_state_loads_empty_and_resets_receiver() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nostate.hmp");
    Element::new("HybMeshData")
        .with_child(
            Element::new("FLOW").with_child(
                Element::new("INFO")
                    .with_child(Element::new("FORMAT_VERSION").with_text("0.9"))
                    .with_child(Element::new("CREATED").with_text("2019-05-01T10:00:00+00:00"))
                    .with_child(Element::new("SAVED").with_text("2019-05-02T10:00:00+00:00")),
            ),
        )
        .write_file(&path)
        .unwrap();

    let engine = CountingEngine::new();
    let mut receiver = sample_project();
    load_project_into(&engine, &mut receiver, &path, ProgressReporter::silent()).unwrap();

    assert!(receiver.framework.is_empty());
    assert!(receiver.history.is_empty());
    assert_eq!(receiver.info.format_version, "0.9");
    assert_eq!(receiver.info.created_at, "2019-05-01T10:00:00+00:00");
    engine.assert_balanced();
}

#[test]
fn duplicate_names_fail_the_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dup.hmp");
    let engine = CountingEngine::new();
    save_project(
        &engine,
        &mut sample_project(),
        &path,
        Encoding::Ascii,
        ProgressReporter::silent(),
    )
    .unwrap();

    let mut root = Element::read_file(&path).unwrap();
    let state = root.find_mut("FLOW/STATE").unwrap();
    let grid = state.child("GRID2D").unwrap().clone();
    state.push(grid);
    root.write_file(&path).unwrap();

    let result = load_project(&engine, &path, ProgressReporter::silent());
    assert!(matches!(
        result,
        Err(PersistenceError::DuplicateName {
            category: Category::Grid2d,
            ..
        })
    ));
    engine.assert_balanced();
}

#[test]
fn save_failures_release_every_handle() {
    let dir = tempdir().unwrap();
    for call in [
        "change_base",
        "write_contours",
        "write_grids2d",
        "write_grids3d",
        "write_surfaces3d",
        "finalize_document",
    ] {
        let path = dir.path().join(format!("{call}.hmp"));
        let engine = CountingEngine::failing_on(call);
        let result = save_project(
            &engine,
            &mut sample_project(),
            &path,
            Encoding::Ascii,
            ProgressReporter::silent(),
        );
        assert!(
            matches!(result, Err(PersistenceError::Engine(_))),
            "{call}: {result:?}"
        );
        assert_eq!(engine.documents_acquired(), 1, "{call}");
        engine.assert_balanced();
    }
}

#[test]
fn load_failures_release_every_handle() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("project.hmp");
    save_project(
        &CountingEngine::new(),
        &mut sample_project(),
        &path,
        Encoding::Binary,
        ProgressReporter::silent(),
    )
    .unwrap();

    for call in [
        "purged_string",
        "query",
        "read_contour",
        "read_grid2d",
        "read_grid3d",
        "read_surface3d",
    ] {
        let engine = CountingEngine::failing_on(call);
        let result = load_project(&engine, &path, ProgressReporter::silent());
        assert!(result.is_err(), "{call}");
        engine.assert_balanced();
    }
}

#[test]
fn cancelled_save_releases_the_writer() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cancel.hmp");
    let engine = CountingEngine::new();
    let sink = RecordingSink::cancelling_after("Write grids");

    let result = save_project(
        &engine,
        &mut sample_project(),
        &path,
        Encoding::Ascii,
        sink.reporter(),
    );

    assert!(matches!(result, Err(PersistenceError::Cancelled)));
    assert_eq!(sink.stages(), ["Write contours", "Write grids"]);
    engine.assert_balanced();
}

#[test]
fn cancelled_load_releases_nodes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cancel.hmp");
    let engine = CountingEngine::new();
    save_project(
        &engine,
        &mut sample_project(),
        &path,
        Encoding::Ascii,
        ProgressReporter::silent(),
    )
    .unwrap();

    let sink = RecordingSink::cancelling_after("Reading grids");
    let result = load_project(&engine, &path, sink.reporter());

    assert!(matches!(result, Err(PersistenceError::Cancelled)));
    assert!(engine.nodes_acquired() > 0);
    engine.assert_balanced();
}

#[test]
fn unwritable_destination_is_io_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing-dir").join("project.hmp");
    let engine = CountingEngine::new();
    let mut project = ProjectFile::new(hm_model::Framework::new());
    project
        .framework
        .add_grid2d("g", typed_square(0.0, 1))
        .unwrap();

    let result = save_project(
        &engine,
        &mut project,
        &path,
        Encoding::Ascii,
        ProgressReporter::silent(),
    );

    assert!(matches!(result, Err(PersistenceError::Io { .. })));
    assert_eq!(engine.documents_acquired(), 0);
}
