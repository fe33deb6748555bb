//! Export frames.
//!
//! Every export table is materialised as a Polars [`DataFrame`] with a fixed
//! column set. Column order here is the order written to disk.

use polars::prelude::{Column, DataFrame, NamedFrom, Series};

use chembl_model::columns::{self, METRIC_COLUMNS};
use chembl_model::{ActivityRecord, ISSUE_FLAGS, Metrics, PairRecord};

use crate::activity_status::ActivityStatus;
use crate::aggregate::LevelTable;
use crate::error::PipelineError;

pub const INITIALIZE_STATUS: &str = "InitializeStatus";
pub const INITIALIZE_PAIRS: &str = "InitializePairs";
pub const ACTIVITY_INITIALIZE_STATUS: &str = "ActivityInitializeStatus";

/// A named table ready for export.
#[derive(Debug, Clone)]
pub struct ExportFrame {
    /// File stem of the exported table.
    pub name: String,
    pub data: DataFrame,
}

impl ExportFrame {
    pub fn new(name: impl Into<String>, data: DataFrame) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn height(&self) -> usize {
        self.data.height()
    }

    pub fn width(&self) -> usize {
        self.data.width()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.data
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }
}

fn text_column(name: &str, values: Vec<String>) -> Column {
    Series::new(name.into(), values).into()
}

fn optional_text_column(name: &str, values: Vec<Option<String>>) -> Column {
    Series::new(name.into(), values).into()
}

fn metric_columns<'a>(metrics: impl Iterator<Item = &'a Metrics>) -> Vec<Column> {
    let mut values: [Vec<f64>; 4] = Default::default();
    for metric in metrics {
        for (idx, value) in metric.values().into_iter().enumerate() {
            values[idx].push(value);
        }
    }
    METRIC_COLUMNS
        .iter()
        .zip(values)
        .map(|(name, values)| Series::new((*name).into(), values).into())
        .collect()
}

fn build(name: &str, columns: Vec<Column>) -> Result<ExportFrame, PipelineError> {
    let data = DataFrame::new(columns).map_err(|source| PipelineError::Frame {
        table: name.to_string(),
        source,
    })?;
    Ok(ExportFrame::new(name, data))
}

/// Classified activities with their flags, metrics and initial status.
pub fn initialize_status_frame(records: &[ActivityRecord]) -> Result<ExportFrame, PipelineError> {
    let mut cols = vec![
        text_column(
            columns::ACTIVITY_ID,
            records.iter().map(|r| r.id.to_string()).collect(),
        ),
        text_column(
            columns::ASSAY_ID,
            records.iter().map(|r| r.assay_id.clone()).collect(),
        ),
        text_column(
            columns::DOCUMENT_ID,
            records.iter().map(|r| r.document_id.to_string()).collect(),
        ),
        optional_text_column(
            columns::TESTITEM_ID,
            records.iter().map(|r| r.testitem_id.clone()).collect(),
        ),
        optional_text_column(
            columns::TARGET_ID,
            records.iter().map(|r| r.target_id.clone()).collect(),
        ),
        text_column(
            columns::MEASUREMENT_TYPE,
            records.iter().map(|r| r.standard_type.clone()).collect(),
        ),
    ];
    for flag in ISSUE_FLAGS {
        let values: Vec<bool> = records.iter().map(|r| r.flags.contains(&flag)).collect();
        cols.push(Series::new(flag.as_str().into(), values).into());
    }
    let no_issue: Vec<bool> = records.iter().map(ActivityRecord::no_issue).collect();
    cols.push(Series::new(columns::NO_ISSUE.into(), no_issue).into());
    cols.extend(metric_columns(records.iter().map(|r| &r.metrics)));
    cols.push(optional_text_column(
        columns::FILTERED,
        records
            .iter()
            .map(|r| r.status.as_ref().map(ToString::to_string))
            .collect(),
    ));
    build(INITIALIZE_STATUS, cols)
}

/// Generated pairs with endpoint and combined statuses.
pub fn initialize_pairs_frame(pairs: &[PairRecord]) -> Result<ExportFrame, PipelineError> {
    let mut cols = vec![
        text_column(
            columns::ACTIVITY_ID1,
            pairs.iter().map(|p| p.left.to_string()).collect(),
        ),
        text_column(
            columns::ACTIVITY_ID2,
            pairs.iter().map(|p| p.right.to_string()).collect(),
        ),
        text_column(
            columns::RELATION,
            pairs.iter().map(|p| p.kind.as_str().to_string()).collect(),
        ),
        text_column(
            columns::FILTERED_LEFT,
            pairs.iter().map(|p| p.left_status.to_string()).collect(),
        ),
        text_column(
            columns::FILTERED_RIGHT,
            pairs.iter().map(|p| p.right_status.to_string()).collect(),
        ),
        text_column(
            columns::FILTERED,
            pairs.iter().map(|p| p.status.to_string()).collect(),
        ),
    ];
    cols.extend(metric_columns(pairs.iter().map(|p| &p.metrics)));
    build(INITIALIZE_PAIRS, cols)
}

/// Initial, pair-derived and final status per activity.
pub fn activity_initialize_status_frame(
    rows: &[ActivityStatus],
) -> Result<ExportFrame, PipelineError> {
    let no_issue: Vec<bool> = rows.iter().map(|row| row.no_issue).collect();
    let pair_count: Vec<u64> = rows.iter().map(|row| row.pair_count as u64).collect();
    let cols = vec![
        text_column(
            columns::ACTIVITY_ID,
            rows.iter().map(|row| row.id.to_string()).collect(),
        ),
        text_column(
            columns::FILTERED_INIT,
            rows.iter().map(|row| row.initial.to_string()).collect(),
        ),
        Series::new(columns::NO_ISSUE.into(), no_issue).into(),
        optional_text_column(
            columns::FILTERED_NEW,
            rows.iter()
                .map(|row| row.from_pairs.as_ref().map(ToString::to_string))
                .collect(),
        ),
        text_column(
            columns::FILTERED,
            rows.iter().map(|row| row.status.to_string()).collect(),
        ),
        Series::new(columns::PAIR_COUNT.into(), pair_count).into(),
    ];
    build(ACTIVITY_INITIALIZE_STATUS, cols)
}

/// One aggregated level: key, status and summed metrics.
pub fn level_frame(table: &LevelTable) -> Result<ExportFrame, PipelineError> {
    let mut cols = vec![
        text_column(
            table.level.key_column(),
            table.rows.iter().map(|row| row.key.clone()).collect(),
        ),
        optional_text_column(
            columns::FILTERED_NEW,
            table
                .rows
                .iter()
                .map(|row| row.status.as_ref().map(ToString::to_string))
                .collect(),
        ),
    ];
    cols.extend(metric_columns(table.rows.iter().map(|row| &row.metrics)));
    build(table.level.as_str(), cols)
}
