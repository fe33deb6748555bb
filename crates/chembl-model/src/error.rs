use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid activity identifier: {0:?}")]
    InvalidActivityId(String),
    #[error("invalid document identifier: {0:?}")]
    InvalidDocumentId(String),
    #[error("invalid status name: {0:?}")]
    InvalidStatus(String),
    #[error("unknown status flag: {0}")]
    UnknownStatusFlag(String),
    #[error("invalid condition value {value:?} for {field}")]
    InvalidConditionValue { field: String, value: String },
}
