pub mod activity_status;
pub mod aggregate;
pub mod classify;
pub mod error;
pub mod frame;
pub mod pairs;
pub mod pipeline;
pub mod status_table;
pub mod validate;

pub use activity_status::{ActivityStatus, activity_statuses};
pub use aggregate::{AggregateSource, LevelTable, aggregate, aggregate_all};
pub use classify::{Classification, check_threshold, classify, classify_record, classify_records};
pub use error::{PipelineError, StatusTableError};
pub use frame::{
    ACTIVITY_INITIALIZE_STATUS, ExportFrame, INITIALIZE_PAIRS, INITIALIZE_STATUS,
    activity_initialize_status_frame, initialize_pairs_frame, initialize_status_frame,
    level_frame,
};
pub use pairs::{PairGeneration, RelationPredicate, generate_pairs, pairs_for_predicate};
pub use pipeline::{PipelineOutput, PlanStep, plan, run_pipeline};
pub use status_table::StatusTable;
pub use validate::{Validated, validate_activities, validate_documents, validate_pairs};
