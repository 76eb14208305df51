//! Integration tests for the `hmio` commands.

use std::path::Path;

use clap::Parser;
use hm_cli::cli::{CategoryArg, Cli, Command};
use hm_cli::commands::{run_export, run_info, run_resave};
use hm_cli::summary::project_json;
use hm_engine::{Encoding, ProgressReporter};
use hm_hmxml::XmlEngine;
use hm_model::{Category, Framework, Grid2D};
use hm_persistence::{ProjectFile, import_objects, save_project};
use tempfile::tempdir;

fn write_project(path: &Path) {
    let mut framework = Framework::new();
    framework
        .add_grid2d("left", Grid2D::rectangle(0.0, 0.0, 1.0, 1.0, 2, 2))
        .unwrap();
    framework
        .add_grid2d("right", Grid2D::rectangle(1.0, 0.0, 1.0, 1.0, 2, 2))
        .unwrap();
    framework.boundary_types.insert(1, "wall");
    let mut project = ProjectFile::new(framework);
    save_project(
        &XmlEngine::new(),
        &mut project,
        path,
        Encoding::Ascii,
        ProgressReporter::silent(),
    )
    .unwrap();
}

fn parse(args: &[&str]) -> Command {
    Cli::try_parse_from(std::iter::once("hmio").chain(args.iter().copied()))
        .unwrap()
        .command
}

#[test]
fn export_arguments_parse() {
    let Command::Export(args) = parse(&[
        "export",
        "case.hmp",
        "--category",
        "grid3d-surface",
        "--format",
        "vtk",
        "--name",
        "vol",
        "-o",
        "out.vtk",
    ]) else {
        panic!("expected export");
    };
    assert_eq!(args.category, CategoryArg::Grid3dSurface);
    assert_eq!(args.names, ["vol"]);
    assert!(!args.binary);

    let missing_name = Cli::try_parse_from([
        "hmio", "export", "case.hmp", "--category", "grid2d", "--format", "vtk", "-o", "x",
    ]);
    assert!(missing_name.is_err());
}

#[test]
fn info_loads_the_project() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("case.hmp");
    write_project(&path);

    let Command::Info(args) = parse(&["info", path.to_str().unwrap()]) else {
        panic!("expected info");
    };
    let project = run_info(&args, ProgressReporter::silent()).unwrap();
    assert_eq!(project.framework.names(Category::Grid2d), ["left", "right"]);
    assert_eq!(project.framework.boundary_types.name(1), Some("wall"));
}

#[test]
fn info_json_lists_saved_metadata() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("case.hmp");
    write_project(&path);

    let Command::Info(args) = parse(&["info", path.to_str().unwrap(), "--json"]) else {
        panic!("expected info");
    };
    assert!(args.json);
    let project = run_info(&args, ProgressReporter::silent()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&project_json(&project).unwrap()).unwrap();

    assert_eq!(value["objects"]["GRID2D"], serde_json::json!(["left", "right"]));
    assert_eq!(value["boundary_types"]["1"], "wall");
    assert_eq!(value["info"]["format_version"], project.info.format_version);
    assert_eq!(value["info"]["last_saved_at"], project.info.last_saved_at);
    assert_eq!(value["history"]["current"], 0);
}

#[test]
fn export_merges_grids_into_one_file() {
    let dir = tempdir().unwrap();
    let project = dir.path().join("case.hmp");
    let output = dir.path().join("both.ggen");
    write_project(&project);

    let Command::Export(args) = parse(&[
        "export",
        project.to_str().unwrap(),
        "--category",
        "grid2d",
        "--format",
        "ggen",
        "--name",
        "left",
        "--name",
        "right",
        "--output",
        output.to_str().unwrap(),
    ]) else {
        panic!("expected export");
    };
    run_export(&args, ProgressReporter::silent()).unwrap();

    let text = std::fs::read_to_string(&output).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("15"));
}

#[test]
fn export_reports_missing_objects() {
    let dir = tempdir().unwrap();
    let project = dir.path().join("case.hmp");
    let output = dir.path().join("none.vtk");
    write_project(&project);

    let Command::Export(args) = parse(&[
        "export",
        project.to_str().unwrap(),
        "--category",
        "grid3d",
        "--format",
        "vtk3d",
        "--name",
        "left",
        "--output",
        output.to_str().unwrap(),
    ]) else {
        panic!("expected export");
    };
    let error = run_export(&args, ProgressReporter::silent()).unwrap_err();
    assert!(format!("{error:#}").contains("left"));
    assert!(!output.exists());
}

#[test]
fn resave_writes_a_binary_copy() {
    let dir = tempdir().unwrap();
    let project = dir.path().join("case.hmp");
    let copy = dir.path().join("copy.hmp");
    write_project(&project);

    let Command::Resave(args) = parse(&[
        "resave",
        project.to_str().unwrap(),
        "--output",
        copy.to_str().unwrap(),
        "--binary",
    ]) else {
        panic!("expected resave");
    };
    run_resave(&args, ProgressReporter::silent()).unwrap();

    let imported = import_objects(&XmlEngine::new(), &copy, ProgressReporter::silent()).unwrap();
    assert_eq!(imported.grids2d.len(), 2);
}
