//! `hmio` command-line tool.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use hm_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use hm_cli::commands::{run_export, run_info, run_resave};
use hm_cli::logging::{LogConfig, LogFormat, init_logging};
use hm_cli::progress::BarSink;
use hm_cli::summary::{print_project, project_json};
use tracing::error;
use tracing::level_filters::LevelFilter;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let sink = BarSink::new(!cli.no_progress && io::stderr().is_terminal());
    let reporter = sink.reporter();
    let result = match &cli.command {
        Command::Info(args) => run_info(args, reporter).and_then(|project| {
            if args.json {
                println!("{}", project_json(&project)?);
            } else {
                print_project(&project);
            }
            Ok(())
        }),
        Command::Export(args) => run_export(args, reporter),
        Command::Resave(args) => run_resave(args, reporter),
    };
    let exit_code = match result {
        Ok(()) => 0,
        Err(err) => {
            error!("{err:#}");
            eprintln!("error: {err:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
