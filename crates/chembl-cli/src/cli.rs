//! CLI argument definitions for the classification pipeline.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use crate::config::ConfigOverrides;

#[derive(Parser)]
#[command(
    name = "chembl-classify",
    version,
    about = "Classify bioactivity measurements and aggregate their statuses",
    long_about = "Classify bioactivity measurements against a status rule table.\n\n\
                  Derives activity pairs, aggregates statuses per activity, assay,\n\
                  document, system, test item and target, and writes CSV tables."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags and `log.level`).
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Classify the input tables and write every output table.
    Run(RunArgs),

    /// Print the stages a run would execute.
    Plan(ConfigArgs),
}

/// Where the effective configuration comes from.
#[derive(Args, Clone, Debug, Default)]
pub struct ConfigArgs {
    /// TOML configuration file.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding status.csv and activities.csv (overrides `io.input_dir`).
    #[arg(long = "input", value_name = "DIR")]
    pub input: Option<PathBuf>,

    /// Directory receiving the output tables (overrides `io.output_dir`).
    #[arg(long = "output", value_name = "DIR")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Clone, Debug, Default)]
pub struct RunArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Print the effective configuration as TOML and exit.
    #[arg(long = "print-config")]
    pub print_config: bool,

    /// Skip the `<table>.meta.json` sidecars.
    #[arg(long = "no-meta")]
    pub no_meta: bool,
}

impl ConfigArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            input_dir: self.input.clone(),
            output_dir: self.output.clone(),
            write_meta: None,
        }
    }
}

impl RunArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            write_meta: self.no_meta.then_some(false),
            ..self.config.overrides()
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
