use std::collections::HashMap;
use std::path::Path;

use csv::ReaderBuilder;

use crate::error::IngestError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    pub separator: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self { separator: b',' }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    /// 1-based line number in the source file.
    pub line: usize,
    pub values: Vec<String>,
}

impl CsvRow {
    /// Trimmed cell at `index`, `None` when the column is absent or empty.
    pub fn cell(&self, index: Option<usize>) -> Option<String> {
        let value = self.values.get(index?)?.trim();
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }
}

#[derive(Debug, Clone)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<CsvRow>,
}

impl CsvTable {
    pub fn lookup(&self) -> ColumnLookup {
        ColumnLookup::new(&self.headers)
    }
}

/// Case-insensitive header index.
#[derive(Debug, Clone)]
pub struct ColumnLookup {
    map: HashMap<String, usize>,
}

impl ColumnLookup {
    pub fn new<S: AsRef<str>>(headers: &[S]) -> Self {
        let mut map = HashMap::new();
        for (idx, name) in headers.iter().enumerate() {
            map.entry(name.as_ref().to_ascii_uppercase()).or_insert(idx);
        }
        Self { map }
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.map.get(&name.to_ascii_uppercase()).copied()
    }

    /// Index of `canonical`, falling back to its first present alias.
    pub fn resolve(&self, canonical: &str, aliases: &[&str]) -> Option<usize> {
        self.get(canonical)
            .or_else(|| aliases.iter().find_map(|alias| self.get(alias)))
    }
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Read a delimited file with a single header row.
///
/// Blank lines are dropped; short rows are padded with empty cells.
pub fn read_csv_table(path: &Path, options: &CsvOptions) -> Result<CsvTable, IngestError> {
    if !path.exists() {
        return Err(IngestError::MissingFile {
            path: path.to_path_buf(),
        });
    }
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(options.separator)
        .from_path(path)
        .map_err(|error| IngestError::csv(path, error))?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(|error| IngestError::csv(path, error))?
        .iter()
        .map(normalize_header)
        .collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|error| IngestError::csv(path, error))?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        let line = record
            .position()
            .map(|position| position.line() as usize)
            .unwrap_or(rows.len() + 2);
        let mut values = Vec::with_capacity(headers.len());
        for idx in 0..headers.len() {
            values.push(normalize_cell(record.get(idx).unwrap_or("")));
        }
        rows.push(CsvRow { line, values });
    }
    Ok(CsvTable { headers, rows })
}

/// Names from `expected` that resolve to no column.
pub(crate) fn missing_columns(lookup: &ColumnLookup, expected: &[(&str, &[&str])]) -> Vec<String> {
    expected
        .iter()
        .filter(|(canonical, aliases)| lookup.resolve(canonical, aliases).is_none())
        .map(|(canonical, _)| (*canonical).to_string())
        .collect()
}
