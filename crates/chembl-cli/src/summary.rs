use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use chembl_model::RunSummary;

use crate::commands::RunOutcome;

/// Skipped rows and warnings listed individually before the rest is elided.
const MAX_LISTED: usize = 20;

pub fn print_summary(outcome: &RunOutcome) {
    println!("Output: {}", outcome.output_dir.display());
    println!("{}", tables_table(outcome));
    println!("{}", counts_table(&outcome.summary));
    if !outcome.summary.status_counts.is_empty() {
        println!();
        println!("Initial statuses:");
        println!("{}", status_table(&outcome.summary));
    }
    print_diagnostics(&outcome.summary);
}

/// One row per exported table, in export order.
pub fn tables_table(outcome: &RunOutcome) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Rows"),
        header_cell("Meta"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Center);
    let mut total_rows = 0usize;
    for path in &outcome.report.tables {
        let name = table_name(path);
        let rows = outcome.summary.table_rows.get(&name).copied().unwrap_or(0);
        total_rows += rows;
        let has_meta = outcome
            .report
            .sidecars
            .iter()
            .any(|sidecar| table_name(sidecar).strip_suffix(".meta") == Some(name.as_str()));
        table.add_row(vec![
            Cell::new(&name),
            Cell::new(rows),
            meta_cell(has_meta),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total_rows).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    table
}

pub fn counts_table(summary: &RunSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Count"), header_cell("Value")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![
        Cell::new("Activities loaded"),
        Cell::new(summary.activities_loaded),
    ]);
    table.add_row(vec![
        Cell::new("Activities classified"),
        Cell::new(summary.activities_classified),
    ]);
    table.add_row(vec![Cell::new("Pairs"), Cell::new(summary.pair_count)]);
    table.add_row(vec![
        Cell::new("Skipped rows"),
        count_cell(summary.skipped_count(), Color::Red),
    ]);
    table.add_row(vec![
        Cell::new("Integrity warnings"),
        count_cell(summary.warnings.len(), Color::Yellow),
    ]);
    table
}

fn status_table(summary: &RunSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Status"), header_cell("Activities")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (status, count) in &summary.status_counts {
        table.add_row(vec![Cell::new(status), Cell::new(count)]);
    }
    table
}

fn print_diagnostics(summary: &RunSummary) {
    if !summary.skipped.is_empty() {
        eprintln!("Skipped rows:");
        for record in summary.skipped.iter().take(MAX_LISTED) {
            eprintln!("- {} row {}: {}", record.table, record.row, record.reason);
        }
        print_elided(summary.skipped.len());
    }
    if !summary.warnings.is_empty() {
        eprintln!("Integrity warnings:");
        for warning in summary.warnings.iter().take(MAX_LISTED) {
            eprintln!("- {} {}: {}", warning.table, warning.key, warning.message);
        }
        print_elided(summary.warnings.len());
    }
}

fn print_elided(total: usize) {
    if total > MAX_LISTED {
        eprintln!("  ... and {} more", total - MAX_LISTED);
    }
}

fn table_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(80);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn meta_cell(present: bool) -> Cell {
    if present {
        Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell("-")
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use chembl_report::ExportReport;

    use super::*;

    fn outcome() -> RunOutcome {
        let mut summary = RunSummary {
            activities_loaded: 3,
            activities_classified: 2,
            pair_count: 1,
            ..RunSummary::default()
        };
        summary.table_rows.insert("InitializeStatus".to_string(), 2);
        summary.table_rows.insert("InitializePairs".to_string(), 1);
        RunOutcome {
            output_dir: PathBuf::from("out"),
            summary,
            report: ExportReport {
                tables: vec![
                    PathBuf::from("out/InitializeStatus.csv"),
                    PathBuf::from("out/InitializePairs.csv"),
                ],
                sidecars: vec![PathBuf::from("out/InitializeStatus.meta.json")],
                summary: Some(PathBuf::from("out/run_summary.json")),
            },
        }
    }

    #[test]
    fn tables_table_lists_exports_and_total() {
        let rendered = tables_table(&outcome()).to_string();
        let status_line = rendered
            .lines()
            .find(|line| line.contains("InitializeStatus"))
            .expect("status row");
        assert!(status_line.contains('2'));
        assert!(status_line.contains('✓'));
        let total_line = rendered
            .lines()
            .find(|line| line.contains("TOTAL"))
            .expect("total row");
        assert!(total_line.contains('3'));
    }

    #[test]
    fn counts_table_shows_pairs() {
        let rendered = counts_table(&outcome().summary).to_string();
        assert!(rendered.contains("Activities classified"));
        assert!(rendered.contains("Pairs"));
    }

    #[test]
    fn names_come_from_file_stems() {
        assert_eq!(table_name(Path::new("out/activity.csv")), "activity");
        assert_eq!(table_name(Path::new("out/activity.meta.json")), "activity.meta");
    }
}
