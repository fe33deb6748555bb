//! Status classification.
//!
//! Rules are tested in the status table's priority order and the first
//! matching rule decides the status. Records matching no rule get the
//! configured fallback.

use tracing::{debug, info};

use chembl_model::{
    ActivityRecord, EmptyStatusFallback, RawActivity, SkippedRecord, StatusRule, StatusValue,
};

use crate::error::PipelineError;
use crate::status_table::StatusTable;
use crate::validate::validate_activities;

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Classified copies, sorted by activity id.
    pub records: Vec<ActivityRecord>,
    pub skipped: Vec<SkippedRecord>,
}

/// Whether `rule` matches `record`. Unconditional rules never match.
pub fn rule_matches(rule: &StatusRule, record: &ActivityRecord) -> bool {
    rule.condition
        .is_some_and(|condition| record.has_flag(condition.flag) == condition.expected)
}

/// Status for one record under `table`.
pub fn classify_record(
    record: &ActivityRecord,
    table: &StatusTable,
    fallback: EmptyStatusFallback,
) -> StatusValue {
    table
        .rules()
        .iter()
        .find(|rule| rule_matches(rule, record))
        .map_or_else(
            || match fallback {
                EmptyStatusFallback::Unclassified => StatusValue::unclassified(),
                EmptyStatusFallback::GlobalMin => table.global_min().clone(),
            },
            |rule| rule.status.clone(),
        )
}

/// Assign a status to already validated records.
pub fn classify_records(
    records: &[ActivityRecord],
    table: &StatusTable,
    fallback: EmptyStatusFallback,
) -> Vec<ActivityRecord> {
    let mut classified: Vec<ActivityRecord> = records
        .iter()
        .map(|record| record.with_status(classify_record(record, table, fallback)))
        .collect();
    classified.sort_by(|a, b| a.id.cmp(&b.id));
    classified
}

/// Validate and classify raw activity rows.
pub fn classify(
    rows: &[RawActivity],
    table: &StatusTable,
    fallback: EmptyStatusFallback,
    na_fill: f64,
) -> Classification {
    let validated = validate_activities(rows, na_fill);
    let records = classify_records(&validated.records, table, fallback);
    debug!(
        classified = records.len(),
        skipped = validated.skipped.len(),
        "activities classified"
    );
    Classification {
        records,
        skipped: validated.skipped,
    }
}

/// Fail once more rows were rejected than `limit` allows.
pub fn check_threshold(skipped: usize, limit: usize) -> Result<(), PipelineError> {
    if skipped > limit {
        return Err(PipelineError::ThresholdExceeded { skipped, limit });
    }
    if skipped > 0 {
        info!(skipped, limit, "malformed records within threshold");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chembl_model::{ActivityId, DocumentId, Metrics, StatusCondition, StatusFlag};

    use super::*;

    fn table() -> StatusTable {
        let rule = |status: &str, field: &str, value: &str, order: i64| StatusRule {
            status: StatusValue::new(status).expect("status"),
            condition: StatusCondition::parse(field, value).expect("condition"),
            order,
            score: 0,
        };
        StatusTable::new(&[
            rule("S1", "high_citation_rate", "true", 1),
            rule("S2", "no_issue", "true", 2),
            rule("S3", "review", "null", 3),
        ])
        .expect("table")
    }

    fn record(id: &str, flags: &[StatusFlag]) -> ActivityRecord {
        ActivityRecord {
            id: ActivityId::new(id).expect("id"),
            document_id: DocumentId::new("d1").expect("doc"),
            assay_id: "as1".to_string(),
            testitem_id: None,
            target_id: None,
            standard_type: "IC50".to_string(),
            flags: flags.iter().copied().collect::<BTreeSet<_>>(),
            metrics: Metrics::default(),
            status: None,
        }
    }

    #[test]
    fn first_matching_rule_wins() {
        let table = table();
        let a1 = record("a1", &[StatusFlag::HighCitationRate]);
        let a2 = record("a2", &[]);
        assert_eq!(
            classify_record(&a1, &table, EmptyStatusFallback::Unclassified).as_str(),
            "S1"
        );
        assert_eq!(
            classify_record(&a2, &table, EmptyStatusFallback::Unclassified).as_str(),
            "S2"
        );
    }

    #[test]
    fn unmatched_records_use_fallback() {
        let table = table();
        let review = record("a3", &[StatusFlag::Review]);
        assert!(
            classify_record(&review, &table, EmptyStatusFallback::Unclassified).is_unclassified()
        );
        assert_eq!(
            classify_record(&review, &table, EmptyStatusFallback::GlobalMin).as_str(),
            "S1"
        );
    }

    #[test]
    fn negated_condition() {
        let table = StatusTable::new(&[StatusRule {
            status: StatusValue::new("clean").expect("status"),
            condition: StatusCondition::parse("review", "false").expect("condition"),
            order: 1,
            score: 1,
        }])
        .expect("table");
        let plain = record("a1", &[]);
        let reviewed = record("a2", &[StatusFlag::Review]);
        let fallback = EmptyStatusFallback::Unclassified;
        assert_eq!(classify_record(&plain, &table, fallback).as_str(), "clean");
        assert!(classify_record(&reviewed, &table, fallback).is_unclassified());
    }

    #[test]
    fn input_is_left_untouched() {
        let table = table();
        let records = vec![record("b", &[]), record("a", &[StatusFlag::HighCitationRate])];
        let classified = classify_records(&records, &table, EmptyStatusFallback::Unclassified);
        assert!(records.iter().all(|record| record.status.is_none()));
        let ids: Vec<&str> = classified.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn threshold() {
        assert!(check_threshold(2, 2).is_ok());
        let error = check_threshold(3, 2).expect_err("over limit");
        assert!(error.is_threshold());
        assert_eq!(
            error.to_string(),
            "3 malformed records exceed runtime.max_malformed_records = 2"
        );
    }
}
