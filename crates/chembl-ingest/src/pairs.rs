use std::path::Path;

use tracing::{debug, warn};

use chembl_model::RawPair;
use chembl_model::columns::{self, METRIC_COLUMNS};

use crate::ReadOptions;
use crate::columns::{aliases, with_aliases};
use crate::csv_table::{missing_columns, read_csv_table};
use crate::error::IngestError;

/// Read the listed pair table.
pub fn read_pairs(path: &Path, options: &ReadOptions) -> Result<Vec<RawPair>, IngestError> {
    let table = read_csv_table(path, &options.csv)?;
    let lookup = table.lookup();

    let mut expected = vec![columns::ACTIVITY_ID1, columns::ACTIVITY_ID2];
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
            "pair table is missing columns"
        );
    }

    let resolve = |name: &str| lookup.resolve(name, aliases(name));
    let left_idx = resolve(columns::ACTIVITY_ID1);
    let right_idx = resolve(columns::ACTIVITY_ID2);
    let metric_idx = METRIC_COLUMNS.map(resolve);

    let pairs: Vec<RawPair> = table
        .rows
        .iter()
        .map(|row| RawPair {
            row: row.line,
            left: row.cell(left_idx),
            right: row.cell(right_idx),
            metrics: metric_idx.map(|idx| row.cell(idx)),
        })
        .collect();
    debug!(file = %path.display(), rows = pairs.len(), "read pairs");
    Ok(pairs)
}
