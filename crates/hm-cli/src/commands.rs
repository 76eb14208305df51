use std::path::Path;

use anyhow::{Context, Result, bail};
use hm_engine::{Encoding, ProgressReporter};
use hm_hmxml::XmlEngine;
use hm_persistence::{
    CompositeConfig, ExportConfig, ProjectFile, export_contour, export_grid2d, export_grid3d,
    export_grid3d_surface, export_surface, load_project, save_project,
};
use tracing::{info, info_span};

use crate::cli::{CategoryArg, ExportArgs, InfoArgs, ResaveArgs};

fn encoding(binary: bool) -> Encoding {
    if binary {
        Encoding::Binary
    } else {
        Encoding::Ascii
    }
}

fn load(engine: &XmlEngine, path: &Path, reporter: ProgressReporter<'_>) -> Result<ProjectFile> {
    load_project(engine, path, reporter)
        .with_context(|| format!("load project {}", path.display()))
}

pub fn run_info(args: &InfoArgs, reporter: ProgressReporter<'_>) -> Result<ProjectFile> {
    let engine = XmlEngine::new();
    load(&engine, &args.project, reporter)
}

pub fn run_export(args: &ExportArgs, reporter: ProgressReporter<'_>) -> Result<()> {
    let span = info_span!("export", project = %args.project.display(), format = %args.format);
    let _guard = span.enter();

    let engine = XmlEngine::new();
    let project = load(&engine, &args.project, reporter.section(0.0, 0.5))?;
    let reporter = reporter.section(0.5, 1.0);
    let framework = &project.framework;
    let names: Vec<&str> = args.names.iter().map(String::as_str).collect();
    let config = if args.binary {
        ExportConfig::Composite(CompositeConfig {
            encoding: Encoding::Binary,
            ..CompositeConfig::default()
        })
    } else {
        ExportConfig::default()
    };
    let (format, output) = (args.format.as_str(), args.output.as_path());

    let exported = match args.category {
        CategoryArg::Contour => {
            export_contour(&engine, format, output, &names, framework, &config, reporter)
        }
        CategoryArg::Grid2d => {
            export_grid2d(&engine, format, output, &names, framework, &config, reporter)
        }
        CategoryArg::Grid3d => {
            export_grid3d(&engine, format, output, &names, framework, &config, reporter)
        }
        CategoryArg::Surface => {
            export_surface(&engine, format, output, &names, framework, &config, reporter)
        }
        CategoryArg::Grid3dSurface => {
            let [name] = names.as_slice() else {
                bail!("grid3d-surface exports exactly one grid, got {}", names.len());
            };
            export_grid3d_surface(&engine, format, output, name, framework, reporter)
        }
    };
    exported.with_context(|| format!("export to {}", output.display()))?;
    info!(count = names.len(), "Export finished");
    Ok(())
}

pub fn run_resave(args: &ResaveArgs, reporter: ProgressReporter<'_>) -> Result<()> {
    let engine = XmlEngine::new();
    let mut project = load(&engine, &args.project, reporter.section(0.0, 0.5))?;
    save_project(
        &engine,
        &mut project,
        &args.output,
        encoding(args.binary),
        reporter.section(0.5, 1.0),
    )
    .with_context(|| format!("save project {}", args.output.display()))?;
    Ok(())
}
