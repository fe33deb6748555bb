use std::collections::HashMap;

use chembl_model::{ActivityId, ActivityRecord, PairRecord, StatusValue};

use crate::status_table::StatusTable;

/// Per-activity view of the initial status next to the status derived from
/// the activity's pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityStatus {
    pub id: ActivityId,
    pub initial: StatusValue,
    pub no_issue: bool,
    /// Greatest pair status, `None` for unpaired activities.
    pub from_pairs: Option<StatusValue>,
    pub status: StatusValue,
    pub pair_count: usize,
}

pub fn activity_statuses(
    records: &[ActivityRecord],
    pairs: &[PairRecord],
    table: &StatusTable,
) -> Vec<ActivityStatus> {
    let mut involved: HashMap<&ActivityId, Vec<&StatusValue>> = HashMap::new();
    for pair in pairs {
        involved.entry(&pair.left).or_default().push(&pair.status);
        if pair.right != pair.left {
            involved.entry(&pair.right).or_default().push(&pair.status);
        }
    }

    let mut rows: Vec<ActivityStatus> = records
        .iter()
        .map(|record| {
            let initial = record
                .status
                .clone()
                .unwrap_or_else(StatusValue::unclassified);
            let statuses = involved.get(&record.id).map(Vec::as_slice).unwrap_or(&[]);
            let from_pairs = table.get_max(statuses.iter().copied());
            let status = table
                .get_max(std::iter::once(&initial).chain(from_pairs.as_ref()))
                .unwrap_or_else(|| initial.clone());
            ActivityStatus {
                id: record.id.clone(),
                no_issue: record.no_issue(),
                from_pairs,
                status,
                pair_count: statuses.len(),
                initial,
            }
        })
        .collect();
    rows.sort_by(|a, b| a.id.cmp(&b.id));
    rows
}
