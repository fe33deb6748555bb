use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use comfy_table::Table;
use tracing::{info, info_span, warn};

use chembl_core::{PlanStep, plan, run_pipeline};
use chembl_ingest::{CsvOptions, ReadOptions, load_input_dir};
use chembl_model::{PipelineOptions, RunSummary};
use chembl_report::{ExportOptions, ExportReport, write_exports};

use crate::summary::{apply_table_style, header_cell};

/// Result of a completed `run`.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub output_dir: PathBuf,
    pub summary: RunSummary,
    pub report: ExportReport,
}

/// Load, classify, pair, aggregate and export.
///
/// Any error leaves the output directory without new tables.
pub fn run_classify(options: &PipelineOptions) -> Result<RunOutcome> {
    let span = info_span!(
        "run",
        input_dir = %options.io.input_dir.display(),
        output_dir = %options.io.output_dir.display()
    );
    let _guard = span.enter();
    let started = Instant::now();

    let separator = options
        .io
        .separator_byte()
        .ok_or_else(|| anyhow!("invalid separator {:?}", options.io.separator))?;
    let read_options = ReadOptions {
        csv: CsvOptions { separator },
        fail_on_missing_columns: options.runtime.fail_on_missing_columns,
    };
    let inputs = load_input_dir(&options.io.input_dir, &read_options)
        .context("load input tables")?;
    let output = run_pipeline(&inputs, options).context("classification failed")?;
    if !output.summary.skipped.is_empty() {
        warn!(
            skipped = output.summary.skipped_count(),
            limit = options.runtime.max_malformed_records,
            "malformed rows skipped"
        );
    }

    let export_options = ExportOptions {
        output_dir: options.io.output_dir.clone(),
        separator,
        write_meta: options.io.write_meta,
        inputs: inputs.sources.clone(),
    };
    let report = write_exports(&output.frames, &output.summary, &export_options)
        .context("export failed")?;
    info!(
        tables = report.tables.len(),
        warnings = output.summary.warnings.len(),
        elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        "run complete"
    );
    Ok(RunOutcome {
        output_dir: options.io.output_dir.clone(),
        summary: output.summary,
        report,
    })
}

pub fn plan_table(steps: &[PlanStep]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("#"), header_cell("Stage"), header_cell("Detail")]);
    apply_table_style(&mut table);
    for (index, step) in steps.iter().enumerate() {
        table.add_row(vec![
            (index + 1).to_string(),
            step.stage.to_string(),
            step.detail.clone(),
        ]);
    }
    table
}

pub fn run_plan(options: &PipelineOptions) {
    println!("{}", plan_table(&plan(options)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_lists_every_stage() {
        let rendered = plan_table(&plan(&PipelineOptions::new("in", "out"))).to_string();
        for stage in ["load", "classify", "pairs", "aggregate", "export"] {
            assert!(rendered.contains(stage), "{stage}");
        }
        assert!(rendered.contains("same_document"));
    }
}
