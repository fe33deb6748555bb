//! Non-fatal run diagnostics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Why an input row was excluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    #[error("missing required field {0}")]
    MissingField(String),
    #[error("invalid boolean {value:?} in {column}")]
    InvalidFlag { column: String, value: String },
    #[error("invalid number {value:?} in {column}")]
    InvalidNumber { column: String, value: String },
    #[error("duplicate identifier {0}")]
    DuplicateIdentifier(String),
}

/// An input row excluded from processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRecord {
    /// Source table name (`activities`, `pairs`, `documents`).
    pub table: String,
    pub row: usize,
    pub reason: SkipReason,
}

/// A derived row that referenced something absent from its source table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IntegrityWarning {
    /// Affected output table.
    pub table: String,
    pub key: String,
    pub message: String,
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub activities_loaded: usize,
    pub activities_classified: usize,
    pub pair_count: usize,
    pub skipped: Vec<SkippedRecord>,
    pub warnings: Vec<IntegrityWarning>,
    /// Classified activities per initial status.
    pub status_counts: BTreeMap<String, usize>,
    /// Row count per export table.
    pub table_rows: BTreeMap<String, usize>,
}

impl RunSummary {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn skipped_in(&self, table: &str) -> usize {
        self.skipped
            .iter()
            .filter(|record| record.table == table)
            .count()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
