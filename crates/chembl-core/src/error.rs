use polars::prelude::PolarsError;
use thiserror::Error;

use chembl_model::{ModelError, PredicateKind};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatusTableError {
    #[error("status table has no rows")]
    Empty,
    #[error("status {0} is listed more than once")]
    DuplicateStatus(String),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{skipped} malformed records exceed runtime.max_malformed_records = {limit}")]
    ThresholdExceeded { skipped: usize, limit: usize },

    #[error("invalid status table: {0}")]
    StatusTable(#[from] StatusTableError),

    #[error("pairs.predicates ({kind:?}): {source}")]
    InvalidPredicate {
        kind: PredicateKind,
        #[source]
        source: ModelError,
    },

    #[error("pairs.predicates ({kind:?}): unknown status {status}")]
    UnknownPredicateStatus { kind: PredicateKind, status: String },

    #[error("failed to build {table} frame: {source}")]
    Frame {
        table: String,
        #[source]
        source: PolarsError,
    },
}

impl PipelineError {
    /// True when the run stopped because too many rows were malformed.
    pub fn is_threshold(&self) -> bool {
        matches!(self, PipelineError::ThresholdExceeded { .. })
    }
}
