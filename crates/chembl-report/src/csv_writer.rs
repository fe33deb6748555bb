use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use csv::WriterBuilder;

use chembl_core::ExportFrame;

use crate::values::any_to_string;

/// Render `frame` as delimited text with one header row.
pub fn frame_to_csv(frame: &ExportFrame, separator: u8) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .delimiter(separator)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    let columns = frame.data.get_columns();
    writer
        .write_record(columns.iter().map(|column| column.name().as_str()))
        .with_context(|| format!("write header of {}", frame.name))?;
    let mut record = Vec::with_capacity(columns.len());
    for row_idx in 0..frame.height() {
        record.clear();
        for column in columns {
            let value = column
                .get(row_idx)
                .with_context(|| format!("read {}[{row_idx}]", column.name()))?;
            record.push(any_to_string(value));
        }
        writer
            .write_record(&record)
            .with_context(|| format!("write row {row_idx} of {}", frame.name))?;
    }
    writer
        .into_inner()
        .map_err(|error| anyhow::anyhow!("flush {}: {}", frame.name, error.error()))
}

/// Write `frame` to `path`, returning the bytes that were written.
pub fn write_frame_csv(frame: &ExportFrame, path: &Path, separator: u8) -> Result<Vec<u8>> {
    let bytes = frame_to_csv(frame, separator)?;
    fs::write(path, &bytes).with_context(|| format!("write {}", path.display()))?;
    Ok(bytes)
}
