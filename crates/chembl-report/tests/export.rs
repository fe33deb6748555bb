use std::fs;

use chembl_core::{ExportFrame, LevelTable, initialize_pairs_frame, level_frame};
use chembl_model::{
    ActivityId, EntityAggregate, EntityLevel, Metrics, PairRecord, RelationKind, RunSummary,
    StatusValue,
};
use chembl_report::{
    ExportOptions, RUN_SUMMARY_FILE, TableMeta, frame_to_csv, sha256_hex, write_exports,
};

fn pairs_frame() -> ExportFrame {
    let status = |value: &str| StatusValue::new(value).expect("status");
    let pair = PairRecord {
        left: ActivityId::new("a1").expect("id"),
        right: ActivityId::new("a2").expect("id"),
        kind: RelationKind::SameDocument,
        left_status: status("S1"),
        right_status: status("S2"),
        status: status("S1"),
        metrics: Metrics::from_values([1.0, 0.0, 0.0, 2.5]),
    };
    initialize_pairs_frame(&[pair]).expect("frame")
}

fn options(output_dir: &std::path::Path, write_meta: bool) -> ExportOptions {
    ExportOptions {
        output_dir: output_dir.to_path_buf(),
        separator: b',',
        write_meta,
        inputs: vec!["in/status.csv".into(), "in/activities.csv".into()],
    }
}

#[test]
fn pair_table_csv_text() {
    let bytes = frame_to_csv(&pairs_frame(), b',').expect("render");
    let text = String::from_utf8(bytes).expect("utf8");
    insta::assert_snapshot!(text.trim_end(), @r"
activity_chembl_id1,activity_chembl_id2,relation,Filtered1,Filtered2,Filtered,independent_IC50,non_independent_IC50,independent_Ki,non_independent_Ki
a1,a2,same_document,S1,S2,S1,1,0,0,2.5
");
}

#[test]
fn level_table_csv_text() {
    let row = |key: &str, status: Option<&str>, metrics: [f64; 4]| EntityAggregate {
        level: EntityLevel::Assay,
        key: key.to_string(),
        status: status.map(|value| StatusValue::new(value).expect("status")),
        metrics: Metrics::from_values(metrics),
    };
    let table = LevelTable {
        level: EntityLevel::Assay,
        rows: vec![
            row("as1", Some("S2"), [2.0, 0.0, 1.0, 0.0]),
            row("as2", None, [0.0; 4]),
        ],
        warnings: Vec::new(),
    };
    let frame = level_frame(&table).expect("frame");
    let text = String::from_utf8(frame_to_csv(&frame, b',').expect("render")).expect("utf8");
    insta::assert_snapshot!(text.trim_end(), @r"
assay_chembl_id,Filtered.new,independent_IC50,non_independent_IC50,independent_Ki,non_independent_Ki
as1,S2,2,0,1,0
as2,,0,0,0,0
");
}

#[test]
fn separator_is_configurable() {
    let bytes = frame_to_csv(&pairs_frame(), b';').expect("render");
    let text = String::from_utf8(bytes).expect("utf8");
    assert!(text.lines().nth(1).expect("row").starts_with("a1;a2;same_document;"));
}

#[test]
fn writes_tables_sidecars_and_summary() {
    let dir = tempfile::tempdir().expect("temp dir");
    let summary = RunSummary {
        activities_loaded: 2,
        activities_classified: 2,
        pair_count: 1,
        ..RunSummary::default()
    };
    let report = write_exports(&[pairs_frame()], &summary, &options(dir.path(), true))
        .expect("export");
    assert_eq!(report.file_count(), 3);

    let csv_bytes = fs::read(dir.path().join("InitializePairs.csv")).expect("csv");
    let meta: TableMeta = serde_json::from_str(
        &fs::read_to_string(dir.path().join("InitializePairs.meta.json")).expect("meta"),
    )
    .expect("parse meta");
    assert_eq!(meta.rows, 1);
    assert_eq!(meta.cols, 10);
    assert_eq!(meta.sha256, sha256_hex(&csv_bytes));
    assert_eq!(meta.inputs, vec!["in/status.csv", "in/activities.csv"]);

    let saved: RunSummary = serde_json::from_str(
        &fs::read_to_string(dir.path().join(RUN_SUMMARY_FILE)).expect("summary"),
    )
    .expect("parse summary");
    assert_eq!(saved, summary);

    let leftovers: Vec<String> = fs::read_dir(dir.path())
        .expect("list")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with(".staging-"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn meta_can_be_disabled() {
    let dir = tempfile::tempdir().expect("temp dir");
    let report = write_exports(
        &[pairs_frame()],
        &RunSummary::default(),
        &options(dir.path(), false),
    )
    .expect("export");
    assert!(report.sidecars.is_empty());
    assert!(!dir.path().join("InitializePairs.meta.json").exists());
}

#[test]
fn repeated_exports_are_byte_identical() {
    let dir = tempfile::tempdir().expect("temp dir");
    let opts = options(dir.path(), true);
    write_exports(&[pairs_frame()], &RunSummary::default(), &opts).expect("first");
    let first = fs::read(dir.path().join("InitializePairs.csv")).expect("read");
    write_exports(&[pairs_frame()], &RunSummary::default(), &opts).expect("second");
    let second = fs::read(dir.path().join("InitializePairs.csv")).expect("read");
    assert_eq!(first, second);
}

#[test]
fn failed_export_leaves_no_tables() {
    let dir = tempfile::tempdir().expect("temp dir");
    let good = pairs_frame();
    let mut bad = pairs_frame();
    bad.name = "missing/InitializePairs".to_string();
    let result = write_exports(&[good, bad], &RunSummary::default(), &options(dir.path(), true));
    assert!(result.is_err());
    let entries = fs::read_dir(dir.path()).expect("list").count();
    assert_eq!(entries, 0);
}
