pub mod activity;
pub mod aggregate;
pub mod columns;
pub mod diagnostics;
pub mod error;
pub mod ids;
pub mod options;
pub mod pair;
pub mod status;

pub use activity::{ActivityRecord, DocumentRecord, Metrics, RawActivity, RawDocument};
pub use aggregate::{EntityAggregate, EntityLevel, SystemKey};
pub use diagnostics::{IntegrityWarning, RunSummary, SkipReason, SkippedRecord};
pub use error::ModelError;
pub use ids::{ActivityId, DocumentId};
pub use options::{
    EmptyStatusFallback, IoOptions, LogOptions, PairOptions, PipelineOptions, PredicateConfig,
    RuntimeOptions, StatusOptions,
};
pub use pair::{ListedPair, PairRecord, PredicateKind, RawPair, RelationKind};
pub use status::{ISSUE_FLAGS, StatusCondition, StatusFlag, StatusRule, StatusValue};
