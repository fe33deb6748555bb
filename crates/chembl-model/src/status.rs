//! Status vocabulary: issue flags, status values and rule-table rows.
//!
//! A status rule ties a status name to an optional flag condition. Rules are
//! evaluated in `order`; rows without a condition (`condition_value = null`)
//! only take part in status ordering.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Boolean issue flag carried by an activity.
///
/// `NoIssue` is derived: it holds exactly when no other flag is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFlag {
    HighCitationRate,
    UnicellularOrganism,
    Review,
    RoundedDataCitation,
    ShuffledAssay,
    /// Spelled as in the source exports.
    HiglyCorrelatedAssay,
    ExactDataCitation,
    MultmolAssay,
    MultifunctionalEnzyme,
    UnknownChirality,
    NoIssue,
}

/// Flags read from activity rows, in input column order.
pub const ISSUE_FLAGS: [StatusFlag; 10] = [
    StatusFlag::HighCitationRate,
    StatusFlag::UnicellularOrganism,
    StatusFlag::Review,
    StatusFlag::RoundedDataCitation,
    StatusFlag::ShuffledAssay,
    StatusFlag::HiglyCorrelatedAssay,
    StatusFlag::ExactDataCitation,
    StatusFlag::MultmolAssay,
    StatusFlag::MultifunctionalEnzyme,
    StatusFlag::UnknownChirality,
];

impl StatusFlag {
    /// Column name used in input and export tables.
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFlag::HighCitationRate => "high_citation_rate",
            StatusFlag::UnicellularOrganism => "unicellular_organism",
            StatusFlag::Review => "review",
            StatusFlag::RoundedDataCitation => "rounded_data_citation",
            StatusFlag::ShuffledAssay => "shuffled_assay",
            StatusFlag::HiglyCorrelatedAssay => "higly_correlated_assay",
            StatusFlag::ExactDataCitation => "exact_data_citation",
            StatusFlag::MultmolAssay => "multmol_assay",
            StatusFlag::MultifunctionalEnzyme => "multifunctional_enzyme",
            StatusFlag::UnknownChirality => "unknown_chirality",
            StatusFlag::NoIssue => "no_issue",
        }
    }

    pub fn is_derived(&self) -> bool {
        matches!(self, StatusFlag::NoIssue)
    }
}

impl fmt::Display for StatusFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFlag {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed == StatusFlag::NoIssue.as_str() {
            return Ok(StatusFlag::NoIssue);
        }
        ISSUE_FLAGS
            .iter()
            .copied()
            .find(|flag| flag.as_str() == trimmed)
            .ok_or_else(|| ModelError::UnknownStatusFlag(s.to_string()))
    }
}

/// A status name taken from the rule table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusValue(String);

impl StatusValue {
    /// Status assigned to records that match no rule.
    pub const UNCLASSIFIED: &'static str = "unclassified";

    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidStatus(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn unclassified() -> Self {
        Self(Self::UNCLASSIFIED.to_string())
    }

    pub fn is_unclassified(&self) -> bool {
        self.0 == Self::UNCLASSIFIED
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StatusValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Flag test attached to a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCondition {
    pub flag: StatusFlag,
    pub expected: bool,
}

impl StatusCondition {
    /// Parse the `condition_field` / `condition_value` pair of a rule row.
    ///
    /// `null` (or an empty value) means the row carries no condition.
    pub fn parse(field: &str, value: &str) -> Result<Option<Self>, ModelError> {
        let expected = match value.trim().to_ascii_lowercase().as_str() {
            "" | "null" => return Ok(None),
            "true" | "1" | "yes" | "y" => true,
            "false" | "0" | "no" | "n" => false,
            _ => {
                return Err(ModelError::InvalidConditionValue {
                    field: field.to_string(),
                    value: value.to_string(),
                });
            }
        };
        let flag = field.parse::<StatusFlag>()?;
        Ok(Some(Self { flag, expected }))
    }
}

/// One row of the status rule table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRule {
    pub status: StatusValue,
    pub condition: Option<StatusCondition>,
    pub order: i64,
    pub score: i64,
}
