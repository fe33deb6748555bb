//! Staged export of a finished run.
//!
//! Tables are first written into a staging directory inside the output
//! directory and moved into place only after every file was written. Files
//! replaced while moving are kept in the staging directory until the last
//! move succeeded; if any move fails, the moved files are removed and the
//! replaced ones restored, so a failed export leaves the output directory
//! as it was.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, info_span, warn};

use chembl_core::ExportFrame;
use chembl_model::RunSummary;

use crate::csv_writer::write_frame_csv;
use crate::meta::{TableMeta, meta_file_name};

pub const RUN_SUMMARY_FILE: &str = "run_summary.json";
const STAGING_PREFIX: &str = ".staging-";
/// Subdirectory of the staging directory holding replaced files.
const REPLACED_DIR: &str = ".replaced";

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub output_dir: PathBuf,
    pub separator: u8,
    pub write_meta: bool,
    /// Input files recorded in each sidecar.
    pub inputs: Vec<PathBuf>,
}

/// Files placed in the output directory, in write order.
#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    pub tables: Vec<PathBuf>,
    pub sidecars: Vec<PathBuf>,
    pub summary: Option<PathBuf>,
}

impl ExportReport {
    pub fn file_count(&self) -> usize {
        self.tables.len() + self.sidecars.len() + usize::from(self.summary.is_some())
    }
}

pub fn table_file_name(table: &str) -> String {
    format!("{table}.csv")
}

/// Write every frame, its sidecar and the run summary into
/// `options.output_dir`.
pub fn write_exports(
    frames: &[ExportFrame],
    summary: &RunSummary,
    options: &ExportOptions,
) -> Result<ExportReport> {
    let span = info_span!("export", output_dir = %options.output_dir.display());
    let _guard = span.enter();

    fs::create_dir_all(&options.output_dir)
        .with_context(|| format!("create {}", options.output_dir.display()))?;
    let staging = options
        .output_dir
        .join(format!("{STAGING_PREFIX}{}", std::process::id()));
    if staging.exists() {
        fs::remove_dir_all(&staging)
            .with_context(|| format!("clear {}", staging.display()))?;
    }
    fs::create_dir_all(&staging).with_context(|| format!("create {}", staging.display()))?;

    let staged = stage_files(frames, summary, options, &staging);
    let result = staged.and_then(|names| commit(&staging, &options.output_dir, &names));
    let _ = fs::remove_dir_all(&staging);
    let report = result?;
    info!(files = report.file_count(), "export complete");
    Ok(report)
}

#[derive(Debug, Default)]
struct StagedNames {
    tables: Vec<String>,
    sidecars: Vec<String>,
    summary: Option<String>,
}

fn stage_files(
    frames: &[ExportFrame],
    summary: &RunSummary,
    options: &ExportOptions,
    staging: &Path,
) -> Result<StagedNames> {
    let mut names = StagedNames::default();
    for frame in frames {
        let file_name = table_file_name(&frame.name);
        let bytes = write_frame_csv(frame, &staging.join(&file_name), options.separator)?;
        debug!(table = %frame.name, rows = frame.height(), "staged table");
        names.tables.push(file_name);
        if options.write_meta {
            let meta = TableMeta::new(frame, &bytes, &options.inputs);
            let meta_name = meta_file_name(&frame.name);
            write_json(&staging.join(&meta_name), &meta)?;
            names.sidecars.push(meta_name);
        }
    }
    write_json(&staging.join(RUN_SUMMARY_FILE), summary)?;
    names.summary = Some(RUN_SUMMARY_FILE.to_string());
    Ok(names)
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut text = serde_json::to_string_pretty(value)
        .with_context(|| format!("serialize {}", path.display()))?;
    text.push('\n');
    fs::write(path, text).with_context(|| format!("write {}", path.display()))
}

fn commit(staging: &Path, output_dir: &Path, names: &StagedNames) -> Result<ExportReport> {
    commit_with(staging, output_dir, names, |from, to| fs::rename(from, to))
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Table,
    Sidecar,
    Summary,
}

/// A file moved into the output directory, with the file it replaced.
struct Placed {
    target: PathBuf,
    replaced: Option<PathBuf>,
}

fn commit_with<F>(
    staging: &Path,
    output_dir: &Path,
    names: &StagedNames,
    mut rename: F,
) -> Result<ExportReport>
where
    F: FnMut(&Path, &Path) -> io::Result<()>,
{
    let replaced_dir = staging.join(REPLACED_DIR);
    fs::create_dir_all(&replaced_dir)
        .with_context(|| format!("create {}", replaced_dir.display()))?;

    let entries = names
        .tables
        .iter()
        .map(|name| (Slot::Table, name))
        .chain(names.sidecars.iter().map(|name| (Slot::Sidecar, name)))
        .chain(names.summary.iter().map(|name| (Slot::Summary, name)));

    let mut placed: Vec<Placed> = Vec::new();
    let mut report = ExportReport::default();
    for (slot, name) in entries {
        let target = output_dir.join(name);
        let replaced = if target.exists() {
            let saved = replaced_dir.join(name);
            if let Err(error) = rename(&target, &saved) {
                roll_back(&placed);
                return Err(error).with_context(|| format!("set aside {}", target.display()));
            }
            Some(saved)
        } else {
            None
        };
        if let Err(error) = rename(&staging.join(name), &target) {
            placed.push(Placed {
                target: target.clone(),
                replaced,
            });
            roll_back(&placed);
            return Err(error).with_context(|| format!("move {} into place", target.display()));
        }
        match slot {
            Slot::Table => report.tables.push(target.clone()),
            Slot::Sidecar => report.sidecars.push(target.clone()),
            Slot::Summary => report.summary = Some(target.clone()),
        }
        placed.push(Placed { target, replaced });
    }
    Ok(report)
}

/// Undo `placed` in reverse order.
fn roll_back(placed: &[Placed]) {
    for entry in placed.iter().rev() {
        if entry.target.is_file()
            && let Err(error) = fs::remove_file(&entry.target)
        {
            warn!(path = %entry.target.display(), %error, "failed to remove exported file");
        }
        if let Some(saved) = &entry.replaced
            && let Err(error) = fs::rename(saved, &entry.target)
        {
            warn!(path = %entry.target.display(), %error, "failed to restore replaced file");
        }
    }
}
