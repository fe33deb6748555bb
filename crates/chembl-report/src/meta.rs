use std::path::PathBuf;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use chembl_core::ExportFrame;

use crate::hash::sha256_hex;

/// Sidecar written next to each exported table as `<name>.meta.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMeta {
    pub table: String,
    pub generated_at: String,
    pub version: String,
    pub inputs: Vec<String>,
    pub rows: usize,
    pub cols: usize,
    pub columns: Vec<String>,
    pub sha256: String,
}

impl TableMeta {
    pub fn new(frame: &ExportFrame, bytes: &[u8], inputs: &[PathBuf]) -> Self {
        Self {
            table: frame.name.clone(),
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            version: env!("CARGO_PKG_VERSION").to_string(),
            inputs: inputs
                .iter()
                .map(|path| path.display().to_string())
                .collect(),
            rows: frame.height(),
            cols: frame.width(),
            columns: frame.column_names(),
            sha256: sha256_hex(bytes),
        }
    }
}

pub fn meta_file_name(table: &str) -> String {
    format!("{table}.meta.json")
}
