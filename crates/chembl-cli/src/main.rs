//! Bioactivity classification CLI.

use std::io::{self, IsTerminal};
use std::path::Path;

use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

use chembl_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use chembl_cli::logging::{LogConfig, LogFormat, init_logging, parse_level};
use chembl_cli::summary::print_summary;
use chembl_cli::{ConfigOverrides, load_config, render_config, run_classify, run_plan};
use chembl_model::PipelineOptions;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let (config_path, overrides) = match &cli.command {
        Command::Run(args) => (args.config.config.as_deref(), args.overrides()),
        Command::Plan(args) => (args.config.as_deref(), args.overrides()),
    };
    let options = match effective_options(config_path, &overrides) {
        Ok(options) => options,
        Err(error) => {
            eprintln!("error: {error:#}");
            std::process::exit(1);
        }
    };
    let log_config = log_config_from_cli(&cli, &options);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match &cli.command {
        Command::Run(args) if args.print_config => match render_config(&options) {
            Ok(text) => {
                print!("{text}");
                0
            }
            Err(error) => {
                eprintln!("error: {error}");
                1
            }
        },
        Command::Run(_) => match run_classify(&options) {
            Ok(outcome) => {
                print_summary(&outcome);
                0
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Plan(_) => {
            run_plan(&options);
            0
        }
    };
    std::process::exit(exit_code);
}

fn effective_options(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> anyhow::Result<PipelineOptions> {
    Ok(load_config(path, std::env::vars(), overrides)?)
}

/// Explicit flags win over `-v/-q`, which win over `log.level`.
fn log_config_from_cli(cli: &Cli, options: &PipelineOptions) -> LogConfig {
    let configured = parse_level(&options.log.level).unwrap_or(LevelFilter::INFO);
    let level_filter = if let Some(level) = cli.log_level {
        match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        }
    } else if cli.verbosity.is_present() {
        cli.verbosity.tracing_level_filter()
    } else {
        configured
    };
    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    let mut config = LogConfig::default()
        .with_level(level_filter)
        .with_format(format)
        .with_log_file(cli.log_file.clone());
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
