use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::aggregate::SystemKey;
use crate::ids::{ActivityId, DocumentId};
use crate::status::{StatusFlag, StatusValue};

/// Measurement counters attached to activities and listed pairs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub independent_ic50: f64,
    pub non_independent_ic50: f64,
    pub independent_ki: f64,
    pub non_independent_ki: f64,
}

impl Metrics {
    /// Values in [`crate::columns::METRIC_COLUMNS`] order.
    pub fn values(&self) -> [f64; 4] {
        [
            self.independent_ic50,
            self.non_independent_ic50,
            self.independent_ki,
            self.non_independent_ki,
        ]
    }

    pub fn from_values(values: [f64; 4]) -> Self {
        Self {
            independent_ic50: values[0],
            non_independent_ic50: values[1],
            independent_ki: values[2],
            non_independent_ki: values[3],
        }
    }

    pub fn add(&mut self, other: &Metrics) {
        self.independent_ic50 += other.independent_ic50;
        self.non_independent_ic50 += other.non_independent_ic50;
        self.independent_ki += other.independent_ki;
        self.non_independent_ki += other.non_independent_ki;
    }

    /// Element-wise maximum.
    pub fn max(&self, other: &Metrics) -> Metrics {
        let left = self.values();
        let right = other.values();
        Metrics::from_values([
            left[0].max(right[0]),
            left[1].max(right[1]),
            left[2].max(right[2]),
            left[3].max(right[3]),
        ])
    }
}

/// An activity row as loaded, before validation.
///
/// Cells are kept as trimmed text; empty cells are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawActivity {
    /// Line number in the source file.
    pub row: usize,
    pub activity_id: Option<String>,
    pub assay_id: Option<String>,
    pub document_id: Option<String>,
    pub testitem_id: Option<String>,
    pub target_id: Option<String>,
    pub standard_type: Option<String>,
    pub flags: BTreeMap<StatusFlag, String>,
    pub metrics: [Option<String>; 4],
}

/// A validated activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: ActivityId,
    pub document_id: DocumentId,
    pub assay_id: String,
    pub testitem_id: Option<String>,
    pub target_id: Option<String>,
    pub standard_type: String,
    /// Issue flags set on this record. Never contains `NoIssue`.
    pub flags: BTreeSet<StatusFlag>,
    pub metrics: Metrics,
    /// Unset until the classifier assigns it.
    pub status: Option<StatusValue>,
}

impl ActivityRecord {
    pub fn no_issue(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn has_flag(&self, flag: StatusFlag) -> bool {
        if flag.is_derived() {
            self.no_issue()
        } else {
            self.flags.contains(&flag)
        }
    }

    /// Copy of this record carrying `status`.
    pub fn with_status(&self, status: StatusValue) -> Self {
        Self {
            status: Some(status),
            ..self.clone()
        }
    }

    /// System grouping key, when test item and target are both known.
    pub fn system_key(&self) -> Option<SystemKey> {
        Some(SystemKey {
            testitem: self.testitem_id.clone()?,
            target: self.target_id.clone()?,
            standard_type: self.standard_type.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDocument {
    pub row: usize,
    pub document_id: Option<String>,
    pub metadata: BTreeMap<String, String>,
}

/// A publication or source record that activities point at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: DocumentId,
    pub metadata: BTreeMap<String, String>,
}
