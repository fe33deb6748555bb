use std::path::{Path, PathBuf};

use tracing::{info, info_span};

use chembl_model::{RawActivity, RawDocument, RawPair, StatusRule};

use crate::ReadOptions;
use crate::activities::read_activities;
use crate::documents::read_documents;
use crate::error::IngestError;
use crate::pairs::read_pairs;
use crate::status::read_status_rules;

pub const STATUS_FILE: &str = "status.csv";
pub const ACTIVITIES_FILE: &str = "activities.csv";
pub const PAIRS_FILE: &str = "pairs.csv";
pub const DOCUMENTS_FILE: &str = "documents.csv";

/// Raw tables of one input snapshot.
#[derive(Debug, Clone)]
pub struct InputTables {
    pub status_rules: Vec<StatusRule>,
    pub activities: Vec<RawActivity>,
    /// `None` when the snapshot has no pair table.
    pub pairs: Option<Vec<RawPair>>,
    /// `None` when the snapshot has no document table.
    pub documents: Option<Vec<RawDocument>>,
    /// Files that were read, in load order.
    pub sources: Vec<PathBuf>,
}

/// Load every input table from `dir`.
///
/// `status.csv` and `activities.csv` are required; `pairs.csv` and
/// `documents.csv` are read when present.
pub fn load_input_dir(dir: &Path, options: &ReadOptions) -> Result<InputTables, IngestError> {
    let span = info_span!("ingest", input_dir = %dir.display());
    let _guard = span.enter();

    let mut sources = Vec::new();

    let status_path = dir.join(STATUS_FILE);
    let status_rules = read_status_rules(&status_path, &options.csv)?;
    sources.push(status_path);

    let activities_path = dir.join(ACTIVITIES_FILE);
    let activities = read_activities(&activities_path, options)?;
    sources.push(activities_path);

    let pairs_path = dir.join(PAIRS_FILE);
    let pairs = if pairs_path.is_file() {
        let pairs = read_pairs(&pairs_path, options)?;
        sources.push(pairs_path);
        Some(pairs)
    } else {
        None
    };

    let documents_path = dir.join(DOCUMENTS_FILE);
    let documents = if documents_path.is_file() {
        let documents = read_documents(&documents_path, &options.csv)?;
        sources.push(documents_path);
        Some(documents)
    } else {
        None
    };

    info!(
        rules = status_rules.len(),
        activities = activities.len(),
        pairs = pairs.as_ref().map_or(0, Vec::len),
        documents = documents.as_ref().map_or(0, Vec::len),
        "inputs loaded"
    );

    Ok(InputTables {
        status_rules,
        activities,
        pairs,
        documents,
        sources,
    })
}
