//! Column names shared by the input and export tables.
//!
//! The names follow the ChEMBL export vocabulary. Export tables keep these
//! headers stable across runs so downstream consumers can rely on them.

pub const ACTIVITY_ID: &str = "activity_chembl_id";
pub const ACTIVITY_ID1: &str = "activity_chembl_id1";
pub const ACTIVITY_ID2: &str = "activity_chembl_id2";
pub const ASSAY_ID: &str = "assay_chembl_id";
pub const DOCUMENT_ID: &str = "document_chembl_id";
pub const TESTITEM_ID: &str = "molecule_chembl_id";
pub const TARGET_ID: &str = "target_chembl_id";
pub const MEASUREMENT_TYPE: &str = "standard_type";
pub const SYSTEM_ID: &str = "system_id";

pub const INDEPENDENT_IC50: &str = "independent_IC50";
pub const NON_INDEPENDENT_IC50: &str = "non_independent_IC50";
pub const INDEPENDENT_KI: &str = "independent_Ki";
pub const NON_INDEPENDENT_KI: &str = "non_independent_Ki";

/// Metric columns in export order.
pub const METRIC_COLUMNS: [&str; 4] = [
    INDEPENDENT_IC50,
    NON_INDEPENDENT_IC50,
    INDEPENDENT_KI,
    NON_INDEPENDENT_KI,
];

pub const NO_ISSUE: &str = "no_issue";
pub const FILTERED: &str = "Filtered";
pub const FILTERED_INIT: &str = "Filtered.init";
pub const FILTERED_NEW: &str = "Filtered.new";
pub const FILTERED_LEFT: &str = "Filtered1";
pub const FILTERED_RIGHT: &str = "Filtered2";
pub const RELATION: &str = "relation";
pub const PAIR_COUNT: &str = "pair_count";

pub const STATUS: &str = "status";
pub const CONDITION_FIELD: &str = "condition_field";
pub const CONDITION_VALUE: &str = "condition_value";
pub const ORDER: &str = "order";
pub const SCORE: &str = "score";
