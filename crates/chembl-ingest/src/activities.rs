use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, warn};

use chembl_model::columns::{self, METRIC_COLUMNS};
use chembl_model::{ISSUE_FLAGS, RawActivity, StatusFlag};

use crate::ReadOptions;
use crate::columns::{aliases, with_aliases};
use crate::csv_table::{missing_columns, read_csv_table};
use crate::error::IngestError;

const ID_COLUMNS: [&str; 6] = [
    columns::ACTIVITY_ID,
    columns::ASSAY_ID,
    columns::DOCUMENT_ID,
    columns::TESTITEM_ID,
    columns::TARGET_ID,
    columns::MEASUREMENT_TYPE,
];

/// Read the activity table into raw rows.
///
/// Identifier, flag and metric columns are expected. When
/// `fail_on_missing_columns` is off, absent columns are logged and read as
/// empty cells.
pub fn read_activities(path: &Path, options: &ReadOptions) -> Result<Vec<RawActivity>, IngestError> {
    let table = read_csv_table(path, &options.csv)?;
    let lookup = table.lookup();

    let mut expected: Vec<&str> = ID_COLUMNS.to_vec();
    expected.extend(ISSUE_FLAGS.iter().map(StatusFlag::as_str));
    expected.extend(METRIC_COLUMNS);
    let missing = missing_columns(&lookup, &with_aliases(&expected));
    if !missing.is_empty() {
        if options.fail_on_missing_columns {
            return Err(IngestError::MissingColumns {
                path: path.to_path_buf(),
                columns: missing,
            });
        }
        warn!(
            file = %path.display(),
            columns = %missing.join(", "),
            "activity table is missing columns"
        );
    }

    let resolve = |name: &str| lookup.resolve(name, aliases(name));
    let activity_idx = resolve(columns::ACTIVITY_ID);
    let assay_idx = resolve(columns::ASSAY_ID);
    let document_idx = resolve(columns::DOCUMENT_ID);
    let testitem_idx = resolve(columns::TESTITEM_ID);
    let target_idx = resolve(columns::TARGET_ID);
    let type_idx = resolve(columns::MEASUREMENT_TYPE);
    let flag_idx: Vec<_> = ISSUE_FLAGS
        .iter()
        .map(|flag| (*flag, resolve(flag.as_str())))
        .collect();
    let metric_idx = METRIC_COLUMNS.map(resolve);

    let mut activities = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let mut flags = BTreeMap::new();
        for (flag, idx) in &flag_idx {
            if let Some(value) = row.cell(*idx) {
                flags.insert(*flag, value);
            }
        }
        activities.push(RawActivity {
            row: row.line,
            activity_id: row.cell(activity_idx),
            assay_id: row.cell(assay_idx),
            document_id: row.cell(document_idx),
            testitem_id: row.cell(testitem_idx),
            target_id: row.cell(target_idx),
            standard_type: row.cell(type_idx),
            flags,
            metrics: metric_idx.map(|idx| row.cell(idx)),
        });
    }
    debug!(file = %path.display(), rows = activities.len(), "read activities");
    Ok(activities)
}
