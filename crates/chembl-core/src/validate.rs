//! Raw row validation.
//!
//! Each function turns loaded rows into typed records and reports the rows it
//! could not accept. Rejected rows never reach classification.

use std::collections::{BTreeMap, BTreeSet};

use chembl_model::columns::{self, METRIC_COLUMNS};
use chembl_model::{
    ActivityId, ActivityRecord, DocumentId, DocumentRecord, ListedPair, Metrics, RawActivity,
    RawDocument, RawPair, SkipReason, SkippedRecord,
};

pub const ACTIVITIES_TABLE: &str = "activities";
pub const PAIRS_TABLE: &str = "pairs";
pub const DOCUMENTS_TABLE: &str = "documents";

/// Validated rows of one table plus the rows that were rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated<T> {
    pub records: Vec<T>,
    pub skipped: Vec<SkippedRecord>,
}

impl<T> Default for Validated<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

/// Parse a flag cell. Absent cells read as `false`.
pub fn parse_flag(value: Option<&str>) -> Option<bool> {
    let Some(value) = value else {
        return Some(false);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "f" | "0" | "0.0" | "no" | "n" => Some(false),
        "true" | "t" | "1" | "1.0" | "yes" | "y" => Some(true),
        _ => None,
    }
}

/// Parse a metric cell, filling absent and NaN cells with `na_fill`.
pub fn parse_metric(value: Option<&str>, na_fill: f64) -> Option<f64> {
    let Some(value) = value else {
        return Some(na_fill);
    };
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("na") {
        return Some(na_fill);
    }
    let parsed = trimmed.parse::<f64>().ok()?;
    if parsed.is_nan() {
        Some(na_fill)
    } else {
        Some(parsed)
    }
}

fn parse_metrics(cells: &[Option<String>; 4], na_fill: f64) -> Result<Metrics, SkipReason> {
    let mut values = [0.0; 4];
    for (idx, cell) in cells.iter().enumerate() {
        values[idx] = parse_metric(cell.as_deref(), na_fill).ok_or_else(|| {
            SkipReason::InvalidNumber {
                column: METRIC_COLUMNS[idx].to_string(),
                value: cell.clone().unwrap_or_default(),
            }
        })?;
    }
    Ok(Metrics::from_values(values))
}

fn required(value: Option<&String>, column: &str) -> Result<String, SkipReason> {
    value
        .cloned()
        .ok_or_else(|| SkipReason::MissingField(column.to_string()))
}

fn validate_activity(raw: &RawActivity, na_fill: f64) -> Result<ActivityRecord, SkipReason> {
    let id = required(raw.activity_id.as_ref(), columns::ACTIVITY_ID)?;
    let assay_id = required(raw.assay_id.as_ref(), columns::ASSAY_ID)?;
    let document_id = required(raw.document_id.as_ref(), columns::DOCUMENT_ID)?;
    let standard_type = required(raw.standard_type.as_ref(), columns::MEASUREMENT_TYPE)?;

    let mut flags = BTreeSet::new();
    for (flag, value) in &raw.flags {
        match parse_flag(Some(value.as_str())) {
            Some(true) => {
                flags.insert(*flag);
            }
            Some(false) => {}
            None => {
                return Err(SkipReason::InvalidFlag {
                    column: flag.as_str().to_string(),
                    value: value.clone(),
                });
            }
        }
    }
    let metrics = parse_metrics(&raw.metrics, na_fill)?;

    Ok(ActivityRecord {
        id: ActivityId::new(id)
            .map_err(|_| SkipReason::MissingField(columns::ACTIVITY_ID.to_string()))?,
        document_id: DocumentId::new(document_id)
            .map_err(|_| SkipReason::MissingField(columns::DOCUMENT_ID.to_string()))?,
        assay_id,
        testitem_id: raw.testitem_id.clone(),
        target_id: raw.target_id.clone(),
        standard_type,
        flags,
        metrics,
        status: None,
    })
}

/// Validate activity rows.
///
/// Every occurrence of a duplicated activity id is rejected, so the result
/// does not depend on which copy comes first. Records are returned sorted by
/// id.
pub fn validate_activities(rows: &[RawActivity], na_fill: f64) -> Validated<ActivityRecord> {
    let mut result = Validated::default();
    let mut by_id: BTreeMap<ActivityId, Vec<(usize, ActivityRecord)>> = BTreeMap::new();
    for raw in rows {
        match validate_activity(raw, na_fill) {
            Ok(record) => by_id
                .entry(record.id.clone())
                .or_default()
                .push((raw.row, record)),
            Err(reason) => result.skipped.push(skipped(ACTIVITIES_TABLE, raw.row, reason)),
        }
    }
    for (id, mut occurrences) in by_id {
        if occurrences.len() == 1 {
            if let Some((_, record)) = occurrences.pop() {
                result.records.push(record);
            }
            continue;
        }
        for (row, _) in occurrences {
            result.skipped.push(skipped(
                ACTIVITIES_TABLE,
                row,
                SkipReason::DuplicateIdentifier(id.to_string()),
            ));
        }
    }
    result.skipped.sort_by_key(|record| record.row);
    result
}

fn validate_pair(raw: &RawPair, na_fill: f64) -> Result<ListedPair, SkipReason> {
    let left = required(raw.left.as_ref(), columns::ACTIVITY_ID1)?;
    let right = required(raw.right.as_ref(), columns::ACTIVITY_ID2)?;
    Ok(ListedPair {
        row: raw.row,
        left: ActivityId::new(left)
            .map_err(|_| SkipReason::MissingField(columns::ACTIVITY_ID1.to_string()))?,
        right: ActivityId::new(right)
            .map_err(|_| SkipReason::MissingField(columns::ACTIVITY_ID2.to_string()))?,
        metrics: parse_metrics(&raw.metrics, na_fill)?,
    })
}

/// Validate listed pair rows. Endpoints are checked later against the
/// classified records.
pub fn validate_pairs(rows: &[RawPair], na_fill: f64) -> Validated<ListedPair> {
    let mut result = Validated::default();
    for raw in rows {
        match validate_pair(raw, na_fill) {
            Ok(pair) => result.records.push(pair),
            Err(reason) => result.skipped.push(skipped(PAIRS_TABLE, raw.row, reason)),
        }
    }
    result
}

/// Validate document rows. Duplicated ids are rejected like activities.
pub fn validate_documents(rows: &[RawDocument]) -> Validated<DocumentRecord> {
    let mut result = Validated::default();
    let mut by_id: BTreeMap<DocumentId, Vec<(usize, DocumentRecord)>> = BTreeMap::new();
    for raw in rows {
        let id = raw
            .document_id
            .as_deref()
            .and_then(|value| DocumentId::new(value).ok());
        let Some(id) = id else {
            result.skipped.push(skipped(
                DOCUMENTS_TABLE,
                raw.row,
                SkipReason::MissingField(columns::DOCUMENT_ID.to_string()),
            ));
            continue;
        };
        by_id.entry(id.clone()).or_default().push((
            raw.row,
            DocumentRecord {
                id,
                metadata: raw.metadata.clone(),
            },
        ));
    }
    for (id, mut occurrences) in by_id {
        if occurrences.len() == 1 {
            if let Some((_, record)) = occurrences.pop() {
                result.records.push(record);
            }
            continue;
        }
        for (row, _) in occurrences {
            result.skipped.push(skipped(
                DOCUMENTS_TABLE,
                row,
                SkipReason::DuplicateIdentifier(id.to_string()),
            ));
        }
    }
    result.skipped.sort_by_key(|record| record.row);
    result
}

fn skipped(table: &str, row: usize, reason: SkipReason) -> SkippedRecord {
    SkippedRecord {
        table: table.to_string(),
        row,
        reason,
    }
}
