use std::fmt;

use serde::{Deserialize, Serialize};

use crate::activity::Metrics;
use crate::ids::ActivityId;
use crate::status::StatusValue;

/// Relation kind of a pair.
///
/// Variants are declared alphabetically so the derived ordering matches
/// the ordering of the exported names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// Supplied by the input pair table.
    Listed,
    SameAssay,
    SameDocument,
    SameSystem,
}

impl RelationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::Listed => "listed",
            RelationKind::SameAssay => "same_assay",
            RelationKind::SameDocument => "same_document",
            RelationKind::SameSystem => "same_system",
        }
    }

    /// Symmetric kinds are emitted with `left < right`.
    pub fn is_symmetric(&self) -> bool {
        !matches!(self, RelationKind::Listed)
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relation predicates that can be configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredicateKind {
    SameDocument,
    SameAssay,
    SameSystem,
}

impl PredicateKind {
    pub fn relation(&self) -> RelationKind {
        match self {
            PredicateKind::SameDocument => RelationKind::SameDocument,
            PredicateKind::SameAssay => RelationKind::SameAssay,
            PredicateKind::SameSystem => RelationKind::SameSystem,
        }
    }
}

/// A pair row as loaded from the pair table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPair {
    pub row: usize,
    pub left: Option<String>,
    pub right: Option<String>,
    pub metrics: [Option<String>; 4],
}

/// A validated input pair, not yet checked against classified records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListedPair {
    pub row: usize,
    pub left: ActivityId,
    pub right: ActivityId,
    pub metrics: Metrics,
}

/// A derived relation between two classified activities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairRecord {
    pub left: ActivityId,
    pub right: ActivityId,
    pub kind: RelationKind,
    pub left_status: StatusValue,
    pub right_status: StatusValue,
    /// Combined status of both endpoints.
    pub status: StatusValue,
    pub metrics: Metrics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relation_order_matches_names() {
        let mut kinds = vec![
            RelationKind::SameSystem,
            RelationKind::Listed,
            RelationKind::SameDocument,
            RelationKind::SameAssay,
        ];
        kinds.sort();
        let names: Vec<&str> = kinds.iter().map(RelationKind::as_str).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn listed_is_the_only_ordered_kind() {
        assert!(!RelationKind::Listed.is_symmetric());
        assert!(PredicateKind::SameDocument.relation().is_symmetric());
    }
}
