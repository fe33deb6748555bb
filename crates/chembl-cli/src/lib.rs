//! Command line front end for the classification pipeline.

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod summary;

pub use commands::{RunOutcome, plan_table, run_classify, run_plan};
pub use config::{ConfigError, ConfigOverrides, load_config, render_config};
