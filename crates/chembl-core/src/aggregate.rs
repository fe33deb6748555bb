//! Entity-level rollups.
//!
//! Each level is described by a projection: the keys it must report and the
//! (key, status, metrics) contributions that feed them. One fold turns any
//! projection into rows, so the levels differ only in how they project.

use std::collections::{BTreeMap, BTreeSet};

use tracing::warn;

use chembl_model::{
    ActivityRecord, DocumentRecord, EntityAggregate, EntityLevel, IntegrityWarning, Metrics,
    PairRecord, StatusValue,
};

use crate::status_table::StatusTable;

/// Everything a level may project from.
#[derive(Debug, Clone, Copy)]
pub struct AggregateSource<'a> {
    pub records: &'a [ActivityRecord],
    pub pairs: &'a [PairRecord],
    /// `None` when no document table was loaded.
    pub documents: Option<&'a [DocumentRecord]>,
}

#[derive(Debug, Clone, PartialEq)]
struct Contribution {
    key: String,
    status: StatusValue,
    metrics: Metrics,
}

#[derive(Debug, Default)]
struct Projection {
    declared: BTreeSet<String>,
    contributions: Vec<Contribution>,
    warnings: Vec<IntegrityWarning>,
}

impl Projection {
    fn contribute(&mut self, key: String, status: StatusValue, metrics: Metrics) {
        self.contributions.push(Contribution {
            key,
            status,
            metrics,
        });
    }

    fn warn(&mut self, level: EntityLevel, key: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(IntegrityWarning {
            table: level.as_str().to_string(),
            key: key.into(),
            message: message.into(),
        });
    }
}

/// Aggregated rows of one level.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelTable {
    pub level: EntityLevel,
    /// One row per key, sorted by key.
    pub rows: Vec<EntityAggregate>,
    pub warnings: Vec<IntegrityWarning>,
}

fn record_status(record: &ActivityRecord) -> StatusValue {
    record
        .status
        .clone()
        .unwrap_or_else(StatusValue::unclassified)
}

fn project_pairs(source: &AggregateSource<'_>) -> Projection {
    let level = EntityLevel::Activity;
    let known: BTreeSet<&str> = source
        .records
        .iter()
        .map(|record| record.id.as_str())
        .collect();
    let mut projection = Projection {
        declared: known.iter().map(|id| (*id).to_string()).collect(),
        ..Projection::default()
    };
    for pair in source.pairs {
        for endpoint in [&pair.left, &pair.right] {
            if known.contains(endpoint.as_str()) {
                projection.contribute(endpoint.to_string(), pair.status.clone(), pair.metrics);
            } else {
                projection.warn(
                    level,
                    endpoint.as_str(),
                    format!("pair {}|{} references unknown activity", pair.left, pair.right),
                );
            }
        }
    }
    projection
}

fn project_records(source: &AggregateSource<'_>, level: EntityLevel) -> Projection {
    let mut projection = Projection::default();
    let documents: Option<BTreeSet<&str>> = source
        .documents
        .map(|documents| documents.iter().map(|doc| doc.id.as_str()).collect());
    if level == EntityLevel::Document
        && let Some(documents) = &documents
    {
        projection
            .declared
            .extend(documents.iter().map(|id| (*id).to_string()));
    }

    for record in source.records {
        let key = match level {
            EntityLevel::Assay => Some(record.assay_id.clone()),
            EntityLevel::Document => {
                let id = record.document_id.as_str();
                if documents.as_ref().is_some_and(|known| !known.contains(id)) {
                    projection.warn(
                        level,
                        record.id.as_str(),
                        format!("unknown document {id}"),
                    );
                    continue;
                }
                Some(id.to_string())
            }
            EntityLevel::System => record.system_key().map(|key| key.to_string()),
            EntityLevel::TestItem => record.testitem_id.clone(),
            EntityLevel::Target => record.target_id.clone(),
            EntityLevel::Activity => Some(record.id.to_string()),
        };
        match key {
            Some(key) => projection.contribute(key, record_status(record), record.metrics),
            None => {
                let field = match level {
                    EntityLevel::TestItem => "test item",
                    EntityLevel::Target => "target",
                    _ => "test item or target",
                };
                projection.warn(level, record.id.as_str(), format!("missing {field}"));
            }
        }
    }
    projection
}

fn project(source: &AggregateSource<'_>, level: EntityLevel) -> Projection {
    match level {
        EntityLevel::Activity => project_pairs(source),
        _ => project_records(source, level),
    }
}

/// Group contributions by key: status is the greatest contributing status,
/// metrics are summed. Declared keys without contributions get an empty row.
fn fold(level: EntityLevel, projection: &Projection, table: &StatusTable) -> Vec<EntityAggregate> {
    let mut groups: BTreeMap<&str, (Vec<&StatusValue>, Metrics)> = projection
        .declared
        .iter()
        .map(|key| (key.as_str(), (Vec::new(), Metrics::default())))
        .collect();
    for contribution in &projection.contributions {
        let (statuses, metrics) = groups.entry(contribution.key.as_str()).or_default();
        statuses.push(&contribution.status);
        metrics.add(&contribution.metrics);
    }
    groups
        .into_iter()
        .map(|(key, (statuses, metrics))| EntityAggregate {
            level,
            key: key.to_string(),
            status: table.get_max(statuses),
            metrics,
        })
        .collect()
}

/// Aggregate `source` at `level`.
pub fn aggregate(source: &AggregateSource<'_>, level: EntityLevel, table: &StatusTable) -> LevelTable {
    let mut projection = project(source, level);
    let rows = fold(level, &projection, table);
    projection.warnings.sort();
    projection.warnings.dedup();
    if !projection.warnings.is_empty() {
        warn!(
            level = level.as_str(),
            warnings = projection.warnings.len(),
            "rows excluded from level"
        );
    }
    LevelTable {
        level,
        rows,
        warnings: projection.warnings,
    }
}

/// Aggregate every level in export order.
pub fn aggregate_all(source: &AggregateSource<'_>, table: &StatusTable) -> Vec<LevelTable> {
    EntityLevel::ALL
        .iter()
        .map(|level| aggregate(source, *level, table))
        .collect()
}
