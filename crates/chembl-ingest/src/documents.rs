use std::collections::BTreeMap;
use std::path::Path;

use chembl_model::RawDocument;
use chembl_model::columns;

use crate::columns::aliases;
use crate::csv_table::{CsvOptions, read_csv_table};
use crate::error::IngestError;

/// Read the document table. Columns other than the identifier are kept as
/// metadata.
pub fn read_documents(path: &Path, options: &CsvOptions) -> Result<Vec<RawDocument>, IngestError> {
    let table = read_csv_table(path, options)?;
    let lookup = table.lookup();
    let Some(id_idx) = lookup.resolve(columns::DOCUMENT_ID, aliases(columns::DOCUMENT_ID)) else {
        return Err(IngestError::MissingColumns {
            path: path.to_path_buf(),
            columns: vec![columns::DOCUMENT_ID.to_string()],
        });
    };

    let mut documents = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let mut metadata = BTreeMap::new();
        for (idx, header) in table.headers.iter().enumerate() {
            if idx == id_idx {
                continue;
            }
            if let Some(value) = row.cell(Some(idx)) {
                metadata.insert(header.clone(), value);
            }
        }
        documents.push(RawDocument {
            row: row.line,
            document_id: row.cell(Some(id_idx)),
            metadata,
        });
    }
    Ok(documents)
}
