//! CLI argument definitions for `hmio`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "hmio",
    version,
    about = "Inspect, export and re-save HybMesh project files",
    long_about = "Inspect, export and re-save HybMesh project files.\n\n\
                  Exports contours, 2D grids, 3D grids and surfaces to VTK, Fluent,\n\
                  GMsh, Tecplot, GridGen and native HybMesh documents."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Hide the progress bar.
    #[arg(long = "no-progress", global = true)]
    pub no_progress: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the objects and history of a project.
    Info(InfoArgs),

    /// Export project objects to a mesh file.
    Export(ExportArgs),

    /// Load a project and save it again.
    Resave(ResaveArgs),
}

#[derive(Parser)]
pub struct InfoArgs {
    /// Project file (.hmp).
    #[arg(value_name = "PROJECT")]
    pub project: PathBuf,

    /// Print metadata, history and object names as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser)]
pub struct ExportArgs {
    /// Project file (.hmp).
    #[arg(value_name = "PROJECT")]
    pub project: PathBuf,

    /// Kind of objects to export.
    #[arg(long = "category", value_enum)]
    pub category: CategoryArg,

    /// Format id, e.g. vtk, msh, hmg, vtk3d.
    #[arg(long = "format")]
    pub format: String,

    /// Object to export; repeat for several objects.
    #[arg(long = "name", value_name = "NAME", required = true)]
    pub names: Vec<String>,

    /// Destination file.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: PathBuf,

    /// Write native documents with binary arrays.
    #[arg(long = "binary")]
    pub binary: bool,
}

#[derive(Parser)]
pub struct ResaveArgs {
    /// Project file (.hmp).
    #[arg(value_name = "PROJECT")]
    pub project: PathBuf,

    /// Destination project file.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: PathBuf,

    /// Write binary arrays.
    #[arg(long = "binary")]
    pub binary: bool,
}

/// Export categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    Contour,
    Grid2d,
    Grid3d,
    Surface,
    /// Boundary surface of one 3D grid.
    Grid3dSurface,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
