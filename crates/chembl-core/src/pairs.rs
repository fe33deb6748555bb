//! Pair generation.
//!
//! Configured predicates group classified records into buckets keyed by the
//! reference field they compare; pairs are formed only inside a bucket.
//! Listed pairs from the input pair table are checked against the classified
//! records and kept in their given orientation.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::{debug, warn};

use chembl_model::{
    ActivityId, ActivityRecord, IntegrityWarning, ListedPair, Metrics, PairRecord, PredicateConfig,
    PredicateKind, RelationKind, StatusValue,
};

use crate::error::PipelineError;
use crate::status_table::StatusTable;

pub const PAIRS_OUTPUT: &str = "InitializePairs";

/// A relation predicate built from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationPredicate {
    kind: PredicateKind,
    statuses: Option<BTreeSet<StatusValue>>,
    include_unclassified: bool,
}

impl RelationPredicate {
    pub fn new(kind: PredicateKind) -> Self {
        Self {
            kind,
            statuses: None,
            include_unclassified: true,
        }
    }

    /// Build a predicate, checking its status filter against `table`.
    pub fn from_config(
        config: &PredicateConfig,
        table: &StatusTable,
    ) -> Result<Self, PipelineError> {
        let statuses = match &config.statuses {
            None => None,
            Some(names) => {
                let mut statuses = BTreeSet::new();
                for name in names {
                    let status =
                        StatusValue::new(name.as_str()).map_err(|source| {
                            PipelineError::InvalidPredicate {
                                kind: config.kind,
                                source,
                            }
                        })?;
                    if !status.is_unclassified() && !table.contains(&status) {
                        return Err(PipelineError::UnknownPredicateStatus {
                            kind: config.kind,
                            status: name.clone(),
                        });
                    }
                    statuses.insert(status);
                }
                Some(statuses)
            }
        };
        Ok(Self {
            kind: config.kind,
            statuses,
            include_unclassified: config.include_unclassified,
        })
    }

    pub fn kind(&self) -> PredicateKind {
        self.kind
    }

    pub fn relation(&self) -> RelationKind {
        self.kind.relation()
    }

    /// Whether `record` may take part in this relation at all.
    pub fn admits(&self, record: &ActivityRecord) -> bool {
        let Some(status) = record.status.as_ref() else {
            return false;
        };
        if status.is_unclassified() && !self.include_unclassified {
            return false;
        }
        self.statuses
            .as_ref()
            .is_none_or(|allowed| allowed.contains(status))
    }

    /// Key compared by this predicate, `None` when the record lacks it.
    pub fn bucket_key(&self, record: &ActivityRecord) -> Option<String> {
        match self.kind {
            PredicateKind::SameDocument => Some(record.document_id.to_string()),
            PredicateKind::SameAssay => Some(record.assay_id.clone()),
            PredicateKind::SameSystem => record.system_key().map(|key| key.to_string()),
        }
    }

    pub fn holds(&self, left: &ActivityRecord, right: &ActivityRecord) -> bool {
        if left.id == right.id || !self.admits(left) || !self.admits(right) {
            return false;
        }
        match (self.bucket_key(left), self.bucket_key(right)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PairGeneration {
    /// Pairs sorted by (left, right, kind), without duplicates.
    pub pairs: Vec<PairRecord>,
    pub warnings: Vec<IntegrityWarning>,
}

fn status_of(record: &ActivityRecord) -> StatusValue {
    record
        .status
        .clone()
        .unwrap_or_else(StatusValue::unclassified)
}

fn build_pair(
    left: &ActivityRecord,
    right: &ActivityRecord,
    kind: RelationKind,
    metrics: Metrics,
    table: &StatusTable,
) -> PairRecord {
    let left_status = status_of(left);
    let right_status = status_of(right);
    PairRecord {
        left: left.id.clone(),
        right: right.id.clone(),
        kind,
        status: table.pair(&left_status, &right_status),
        left_status,
        right_status,
        metrics,
    }
}

/// Pairs produced by one predicate.
pub fn pairs_for_predicate(
    records: &[ActivityRecord],
    predicate: &RelationPredicate,
    table: &StatusTable,
) -> Vec<PairRecord> {
    let mut buckets: BTreeMap<String, Vec<&ActivityRecord>> = BTreeMap::new();
    for record in records.iter().filter(|record| predicate.admits(record)) {
        if let Some(key) = predicate.bucket_key(record) {
            buckets.entry(key).or_default().push(record);
        }
    }

    let mut pairs = Vec::new();
    for members in buckets.values_mut() {
        members.sort_by(|a, b| a.id.cmp(&b.id));
        for (idx, left) in members.iter().enumerate() {
            for right in &members[idx + 1..] {
                if left.id == right.id {
                    continue;
                }
                pairs.push(build_pair(
                    left,
                    right,
                    predicate.relation(),
                    Metrics::default(),
                    table,
                ));
            }
        }
    }
    debug!(
        kind = predicate.relation().as_str(),
        buckets = buckets.len(),
        pairs = pairs.len(),
        "predicate pairs"
    );
    pairs
}

/// Generate every pair for the classified `records`.
pub fn generate_pairs(
    records: &[ActivityRecord],
    predicates: &[RelationPredicate],
    listed: &[ListedPair],
    table: &StatusTable,
) -> PairGeneration {
    let by_id: HashMap<&ActivityId, &ActivityRecord> =
        records.iter().map(|record| (&record.id, record)).collect();
    let mut unique: BTreeMap<(ActivityId, ActivityId, RelationKind), PairRecord> = BTreeMap::new();
    let mut warnings = Vec::new();

    for predicate in predicates {
        for pair in pairs_for_predicate(records, predicate, table) {
            unique
                .entry((pair.left.clone(), pair.right.clone(), pair.kind))
                .or_insert(pair);
        }
    }

    for pair in listed {
        let (Some(left), Some(right)) = (by_id.get(&pair.left), by_id.get(&pair.right)) else {
            let missing: Vec<&str> = [&pair.left, &pair.right]
                .into_iter()
                .filter(|id| !by_id.contains_key(id))
                .map(ActivityId::as_str)
                .collect();
            warn!(
                row = pair.row,
                left = %pair.left,
                right = %pair.right,
                "listed pair references unknown activity"
            );
            warnings.push(IntegrityWarning {
                table: PAIRS_OUTPUT.to_string(),
                key: format!("{}|{}", pair.left, pair.right),
                message: format!("unknown activity {}", missing.join(", ")),
            });
            continue;
        };
        let key = (pair.left.clone(), pair.right.clone(), RelationKind::Listed);
        match unique.get_mut(&key) {
            Some(existing) => existing.metrics = existing.metrics.max(&pair.metrics),
            None => {
                unique.insert(
                    key,
                    build_pair(left, right, RelationKind::Listed, pair.metrics, table),
                );
            }
        }
    }

    warnings.sort();
    warnings.dedup();
    PairGeneration {
        pairs: unique.into_values().collect(),
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chembl_model::{DocumentId, StatusCondition, StatusRule};

    use super::*;

    fn table() -> StatusTable {
        let rule = |status: &str, order: i64| StatusRule {
            status: StatusValue::new(status).expect("status"),
            condition: StatusCondition::parse("review", "true").expect("condition"),
            order,
            score: 0,
        };
        StatusTable::new(&[rule("S1", 1), rule("S2", 2)]).expect("table")
    }

    fn record(id: &str, document: &str, assay: &str, status: &str) -> ActivityRecord {
        ActivityRecord {
            id: ActivityId::new(id).expect("id"),
            document_id: DocumentId::new(document).expect("doc"),
            assay_id: assay.to_string(),
            testitem_id: Some("m1".to_string()),
            target_id: Some("t1".to_string()),
            standard_type: "IC50".to_string(),
            flags: BTreeSet::new(),
            metrics: Metrics::default(),
            status: Some(StatusValue::new(status).expect("status")),
        }
    }

    fn id(value: &str) -> ActivityId {
        ActivityId::new(value).expect("id")
    }

    #[test]
    fn same_document_pairs_inside_buckets() {
        let records = vec![
            record("a3", "d1", "x", "S2"),
            record("a1", "d1", "y", "S1"),
            record("a2", "d2", "x", "S1"),
        ];
        let predicates = [RelationPredicate::new(PredicateKind::SameDocument)];
        let result = generate_pairs(&records, &predicates, &[], &table());
        assert_eq!(result.pairs.len(), 1);
        let pair = &result.pairs[0];
        assert_eq!((pair.left.as_str(), pair.right.as_str()), ("a1", "a3"));
        assert_eq!(pair.kind, RelationKind::SameDocument);
        assert_eq!(pair.status.as_str(), "S1");
    }

    #[test]
    fn output_sorted_by_left_right_kind() {
        let records = vec![
            record("a2", "d1", "x", "S1"),
            record("a1", "d1", "x", "S2"),
            record("a0", "d9", "x", "S2"),
        ];
        let predicates = [
            RelationPredicate::new(PredicateKind::SameAssay),
            RelationPredicate::new(PredicateKind::SameDocument),
        ];
        let result = generate_pairs(&records, &predicates, &[], &table());
        let keys: Vec<(&str, &str, &str)> = result
            .pairs
            .iter()
            .map(|p| (p.left.as_str(), p.right.as_str(), p.kind.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("a0", "a1", "same_assay"),
                ("a0", "a2", "same_assay"),
                ("a1", "a2", "same_assay"),
                ("a1", "a2", "same_document"),
            ]
        );
    }

    #[test]
    fn repeated_predicate_emits_each_pair_once() {
        let records = vec![record("a1", "d1", "x", "S1"), record("a2", "d1", "x", "S2")];
        let predicates = [
            RelationPredicate::new(PredicateKind::SameDocument),
            RelationPredicate::new(PredicateKind::SameDocument),
        ];
        let result = generate_pairs(&records, &predicates, &[], &table());
        assert_eq!(result.pairs.len(), 1);
        assert_eq!(result.pairs[0].kind, RelationKind::SameDocument);
    }

    #[test]
    fn status_filter_limits_members() {
        let records = vec![
            record("a1", "d1", "x", "S1"),
            record("a2", "d1", "x", "S2"),
            record("a3", "d1", "x", "S2"),
        ];
        let config = PredicateConfig {
            kind: PredicateKind::SameDocument,
            statuses: Some(vec!["S2".to_string()]),
            include_unclassified: true,
        };
        let predicate = RelationPredicate::from_config(&config, &table()).expect("predicate");
        let result = generate_pairs(&records, &[predicate.clone()], &[], &table());
        assert_eq!(result.pairs.len(), 1);
        assert!(!predicate.holds(&records[0], &records[1]));
        assert!(predicate.holds(&records[1], &records[2]));
    }

    #[test]
    fn unknown_predicate_status_is_rejected() {
        let config = PredicateConfig {
            kind: PredicateKind::SameAssay,
            statuses: Some(vec!["S9".to_string()]),
            include_unclassified: true,
        };
        assert!(matches!(
            RelationPredicate::from_config(&config, &table()),
            Err(PipelineError::UnknownPredicateStatus { .. })
        ));
    }

    #[test]
    fn unclassified_can_be_excluded() {
        let records = vec![
            record("a1", "d1", "x", StatusValue::UNCLASSIFIED),
            record("a2", "d1", "x", "S1"),
        ];
        let mut config = PredicateConfig::new(PredicateKind::SameDocument);
        config.include_unclassified = false;
        let predicate = RelationPredicate::from_config(&config, &table()).expect("predicate");
        assert!(generate_pairs(&records, &[predicate], &[], &table()).pairs.is_empty());

        let open = RelationPredicate::new(PredicateKind::SameDocument);
        let result = generate_pairs(&records, &[open], &[], &table());
        assert!(result.pairs[0].left_status.is_unclassified());
        assert_eq!(result.pairs[0].status.as_str(), "S1");
    }

    #[test]
    fn listed_pairs_keep_orientation_and_max_metrics() {
        let records = vec![record("a1", "d1", "x", "S2"), record("a2", "d2", "y", "S1")];
        let listed = vec![
            ListedPair {
                row: 2,
                left: id("a2"),
                right: id("a1"),
                metrics: Metrics::from_values([1.0, 0.0, 4.0, 0.0]),
            },
            ListedPair {
                row: 3,
                left: id("a2"),
                right: id("a1"),
                metrics: Metrics::from_values([3.0, 0.0, 2.0, 0.0]),
            },
            ListedPair {
                row: 4,
                left: id("a1"),
                right: id("a9"),
                metrics: Metrics::default(),
            },
        ];
        let result = generate_pairs(&records, &[], &listed, &table());
        assert_eq!(result.pairs.len(), 1);
        let pair = &result.pairs[0];
        assert_eq!(pair.left.as_str(), "a2");
        assert_eq!(pair.kind, RelationKind::Listed);
        assert_eq!(pair.metrics.values(), [3.0, 0.0, 4.0, 0.0]);
        assert_eq!(pair.status.as_str(), "S1");
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].key, "a1|a9");
        assert_eq!(result.warnings[0].message, "unknown activity a9");
    }

    #[test]
    fn same_system_skips_records_without_target() {
        let mut lonely = record("a2", "d1", "x", "S1");
        lonely.target_id = None;
        let records = vec![record("a1", "d1", "x", "S1"), lonely, record("a3", "d2", "z", "S2")];
        let predicates = [RelationPredicate::new(PredicateKind::SameSystem)];
        let result = generate_pairs(&records, &predicates, &[], &table());
        assert_eq!(result.pairs.len(), 1);
        assert_eq!(result.pairs[0].right.as_str(), "a3");
    }
}
