use std::fmt;

use serde::{Deserialize, Serialize};

use crate::activity::Metrics;
use crate::columns;
use crate::status::StatusValue;

/// Aggregation granularity; each level produces one export table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityLevel {
    Activity,
    Assay,
    Document,
    System,
    TestItem,
    Target,
}

impl EntityLevel {
    /// All levels in export order.
    pub const ALL: [EntityLevel; 6] = [
        EntityLevel::Activity,
        EntityLevel::Assay,
        EntityLevel::Document,
        EntityLevel::System,
        EntityLevel::TestItem,
        EntityLevel::Target,
    ];

    /// Export table name (file stem).
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityLevel::Activity => "activity",
            EntityLevel::Assay => "assay",
            EntityLevel::Document => "document",
            EntityLevel::System => "system",
            EntityLevel::TestItem => "testitem",
            EntityLevel::Target => "target",
        }
    }

    /// Header of the grouping key column.
    pub fn key_column(&self) -> &'static str {
        match self {
            EntityLevel::Activity => columns::ACTIVITY_ID,
            EntityLevel::Assay => columns::ASSAY_ID,
            EntityLevel::Document => columns::DOCUMENT_ID,
            EntityLevel::System => columns::SYSTEM_ID,
            EntityLevel::TestItem => columns::TESTITEM_ID,
            EntityLevel::Target => columns::TARGET_ID,
        }
    }
}

impl fmt::Display for EntityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// (test item, target, measurement type) triple.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SystemKey {
    pub testitem: String,
    pub target: String,
    pub standard_type: String,
}

impl fmt::Display for SystemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.testitem, self.target, self.standard_type)
    }
}

/// One aggregated row of an entity level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityAggregate {
    pub level: EntityLevel,
    pub key: String,
    /// Highest-ordered contributing status, `None` for an empty aggregate.
    pub status: Option<StatusValue>,
    pub metrics: Metrics,
}
