use std::path::Path;

use chembl_model::columns;
use chembl_model::{StatusCondition, StatusRule, StatusValue};

use crate::columns::with_aliases;
use crate::csv_table::{CsvOptions, missing_columns, read_csv_table};
use crate::error::IngestError;

const REQUIRED: [&str; 5] = [
    columns::STATUS,
    columns::CONDITION_FIELD,
    columns::CONDITION_VALUE,
    columns::ORDER,
    columns::SCORE,
];

/// Read the status rule table.
///
/// Every column is required and every row must parse; the rule table is
/// configuration, so a bad row fails the run.
pub fn read_status_rules(path: &Path, options: &CsvOptions) -> Result<Vec<StatusRule>, IngestError> {
    let table = read_csv_table(path, options)?;
    let lookup = table.lookup();
    let missing = missing_columns(&lookup, &with_aliases(&REQUIRED));
    if !missing.is_empty() {
        return Err(IngestError::MissingColumns {
            path: path.to_path_buf(),
            columns: missing,
        });
    }
    let status_idx = lookup.get(columns::STATUS);
    let field_idx = lookup.get(columns::CONDITION_FIELD);
    let value_idx = lookup.get(columns::CONDITION_VALUE);
    let order_idx = lookup.get(columns::ORDER);
    let score_idx = lookup.get(columns::SCORE);

    let mut rules = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let invalid = |message: String| IngestError::InvalidStatusRule {
            path: path.to_path_buf(),
            line: row.line,
            message,
        };
        let status = StatusValue::new(row.cell(status_idx).unwrap_or_default())
            .map_err(|error| invalid(error.to_string()))?;
        let condition = StatusCondition::parse(
            &row.cell(field_idx).unwrap_or_default(),
            &row.cell(value_idx).unwrap_or_default(),
        )
        .map_err(|error| invalid(error.to_string()))?;
        let order = parse_integer(row.cell(order_idx), columns::ORDER).map_err(&invalid)?;
        let score = parse_integer(row.cell(score_idx), columns::SCORE).map_err(&invalid)?;
        rules.push(StatusRule {
            status,
            condition,
            order,
            score,
        });
    }
    Ok(rules)
}

fn parse_integer(value: Option<String>, column: &str) -> Result<i64, String> {
    let Some(value) = value else {
        return Err(format!("missing {column}"));
    };
    value
        .parse::<i64>()
        .map_err(|_| format!("invalid {column} {value:?}"))
}
