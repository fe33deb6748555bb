//! Configuration options for a classification run.
//!
//! The options are built once at startup (file, environment and command
//! line merged by the CLI) and handed to each stage by reference.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::pair::PredicateKind;

/// Status assigned when no rule matches a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyStatusFallback {
    /// Assign the reserved `unclassified` status.
    #[default]
    Unclassified,
    /// Assign the first status of the rule table.
    GlobalMin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IoOptions {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Single-character field separator for input and output tables.
    #[serde(default = "default_separator")]
    pub separator: String,
    /// Write `<table>.meta.json` sidecars next to each export.
    #[serde(default = "default_true")]
    pub write_meta: bool,
}

impl IoOptions {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            separator: default_separator(),
            write_meta: true,
        }
    }

    /// Separator as a byte, if it is a single ASCII character.
    pub fn separator_byte(&self) -> Option<u8> {
        match self.separator.as_bytes() {
            [byte] if byte.is_ascii() => Some(*byte),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatusOptions {
    #[serde(default)]
    pub empty_fallback: EmptyStatusFallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuntimeOptions {
    /// Largest tolerated number of malformed input rows.
    #[serde(default = "default_max_malformed")]
    pub max_malformed_records: usize,
    /// Abort when an input table lacks an expected column.
    #[serde(default = "default_true")]
    pub fail_on_missing_columns: bool,
    /// Value used for empty metric cells.
    #[serde(default)]
    pub float_na_fill: f64,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            max_malformed_records: default_max_malformed(),
            fail_on_missing_columns: true,
            float_na_fill: 0.0,
        }
    }
}

/// A configured relation predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PredicateConfig {
    pub kind: PredicateKind,
    /// When set, both endpoints must carry one of these statuses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statuses: Option<Vec<String>>,
    /// Whether records that matched no rule take part.
    #[serde(default = "default_true")]
    pub include_unclassified: bool,
}

impl PredicateConfig {
    pub fn new(kind: PredicateKind) -> Self {
        Self {
            kind,
            statuses: None,
            include_unclassified: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PairOptions {
    #[serde(default = "default_predicates")]
    pub predicates: Vec<PredicateConfig>,
}

impl Default for PairOptions {
    fn default() -> Self {
        Self {
            predicates: default_predicates(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogOptions {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Effective configuration of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineOptions {
    pub io: IoOptions,
    #[serde(default)]
    pub status: StatusOptions,
    #[serde(default)]
    pub runtime: RuntimeOptions,
    #[serde(default)]
    pub pairs: PairOptions,
    #[serde(default)]
    pub log: LogOptions,
}

impl PipelineOptions {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            io: IoOptions::new(input_dir, output_dir),
            status: StatusOptions::default(),
            runtime: RuntimeOptions::default(),
            pairs: PairOptions::default(),
            log: LogOptions::default(),
        }
    }
}

fn default_separator() -> String {
    ",".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_malformed() -> usize {
    100
}

fn default_predicates() -> Vec<PredicateConfig> {
    vec![PredicateConfig::new(PredicateKind::SameDocument)]
}

fn default_log_level() -> String {
    "info".to_string()
}
