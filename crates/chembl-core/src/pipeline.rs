//! End-to-end run over one loaded input snapshot.

use std::collections::BTreeMap;

use tracing::{info, info_span, warn};

use chembl_ingest::InputTables;
use chembl_model::{PipelineOptions, RunSummary};

use crate::activity_status::activity_statuses;
use crate::aggregate::{AggregateSource, aggregate_all};
use crate::classify::{check_threshold, classify};
use crate::error::PipelineError;
use crate::frame::{
    ExportFrame, activity_initialize_status_frame, initialize_pairs_frame,
    initialize_status_frame, level_frame,
};
use crate::pairs::{RelationPredicate, generate_pairs};
use crate::status_table::StatusTable;
use crate::validate::{Validated, validate_documents, validate_pairs};

/// Frames in export order plus the run summary.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub frames: Vec<ExportFrame>,
    pub summary: RunSummary,
}

/// One stage of the run as shown by `plan`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanStep {
    pub stage: &'static str,
    pub detail: String,
}

/// Describe the stages `run_pipeline` will execute under `options`.
pub fn plan(options: &PipelineOptions) -> Vec<PlanStep> {
    let predicates: Vec<String> = options
        .pairs
        .predicates
        .iter()
        .map(|predicate| {
            let mut text = predicate.kind.relation().as_str().to_string();
            if let Some(statuses) = &predicate.statuses {
                text.push_str(&format!("[{}]", statuses.join("|")));
            }
            if !predicate.include_unclassified {
                text.push_str(" (classified only)");
            }
            text
        })
        .collect();
    vec![
        PlanStep {
            stage: "load",
            detail: format!(
                "read status.csv, activities.csv, pairs.csv?, documents.csv? from {}",
                options.io.input_dir.display()
            ),
        },
        PlanStep {
            stage: "classify",
            detail: format!(
                "first matching rule wins, fallback {:?}, at most {} malformed rows",
                options.status.empty_fallback, options.runtime.max_malformed_records
            ),
        },
        PlanStep {
            stage: "pairs",
            detail: format!("listed pairs plus {}", predicates.join(", ")),
        },
        PlanStep {
            stage: "aggregate",
            detail: "activity, assay, document, system, testitem, target".to_string(),
        },
        PlanStep {
            stage: "export",
            detail: format!("write tables to {}", options.io.output_dir.display()),
        },
    ]
}

/// Run every stage and build the export frames.
///
/// Fails without producing frames when the status table or predicate
/// configuration is invalid, or when more rows were rejected than
/// `runtime.max_malformed_records` allows.
pub fn run_pipeline(
    inputs: &InputTables,
    options: &PipelineOptions,
) -> Result<PipelineOutput, PipelineError> {
    let span = info_span!("pipeline", activities = inputs.activities.len());
    let _guard = span.enter();

    let table = StatusTable::new(&inputs.status_rules)?;
    let predicates = options
        .pairs
        .predicates
        .iter()
        .map(|config| RelationPredicate::from_config(config, &table))
        .collect::<Result<Vec<_>, _>>()?;
    let na_fill = options.runtime.float_na_fill;

    let classification = {
        let _stage = info_span!("classify").entered();
        classify(
            &inputs.activities,
            &table,
            options.status.empty_fallback,
            na_fill,
        )
    };
    let listed = inputs
        .pairs
        .as_deref()
        .map(|rows| validate_pairs(rows, na_fill))
        .unwrap_or_default();
    let documents = inputs.documents.as_deref().map(validate_documents);

    let mut skipped = classification.skipped.clone();
    skipped.extend(listed.skipped.iter().cloned());
    if let Some(Validated {
        skipped: rejected, ..
    }) = &documents
    {
        skipped.extend(rejected.iter().cloned());
    }
    check_threshold(skipped.len(), options.runtime.max_malformed_records)?;

    let generation = {
        let _stage = info_span!("pairs").entered();
        generate_pairs(&classification.records, &predicates, &listed.records, &table)
    };

    let levels = {
        let _stage = info_span!("aggregate").entered();
        let source = AggregateSource {
            records: &classification.records,
            pairs: &generation.pairs,
            documents: documents
                .as_ref()
                .map(|validated| validated.records.as_slice()),
        };
        aggregate_all(&source, &table)
    };
    let statuses = activity_statuses(&classification.records, &generation.pairs, &table);

    let mut frames = vec![
        initialize_status_frame(&classification.records)?,
        initialize_pairs_frame(&generation.pairs)?,
        activity_initialize_status_frame(&statuses)?,
    ];
    for level in &levels {
        frames.push(level_frame(level)?);
    }

    let mut warnings = generation.warnings.clone();
    for level in &levels {
        warnings.extend(level.warnings.iter().cloned());
    }
    let mut status_counts: BTreeMap<String, usize> = BTreeMap::new();
    for record in &classification.records {
        if let Some(status) = &record.status {
            *status_counts.entry(status.to_string()).or_default() += 1;
        }
    }
    let summary = RunSummary {
        activities_loaded: inputs.activities.len(),
        activities_classified: classification.records.len(),
        pair_count: generation.pairs.len(),
        skipped,
        warnings,
        status_counts,
        table_rows: frames
            .iter()
            .map(|frame| (frame.name.clone(), frame.height()))
            .collect(),
    };

    if summary.has_warnings() {
        warn!(
            warnings = summary.warnings.len(),
            "integrity warnings recorded"
        );
    }
    info!(
        classified = summary.activities_classified,
        skipped = summary.skipped_count(),
        pairs = summary.pair_count,
        "pipeline complete"
    );
    Ok(PipelineOutput { frames, summary })
}
