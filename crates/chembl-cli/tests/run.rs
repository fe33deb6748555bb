use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chembl_cli::{ConfigError, ConfigOverrides, load_config, render_config, run_classify};
use chembl_model::{PipelineOptions, RunSummary};

const FLAGS: &str = "high_citation_rate,unicellular_organism,review,rounded_data_citation,\
shuffled_assay,higly_correlated_assay,exact_data_citation,multmol_assay,\
multifunctional_enzyme,unknown_chirality";
const METRICS: &str = "independent_IC50,non_independent_IC50,independent_Ki,non_independent_Ki";

const STATUS: &str = "status,condition_field,condition_value,order,score\n\
S1,high_citation_rate,true,1,10\n\
S2,no_issue,true,2,5\n\
S3,review,null,3,0\n";

const TABLES: [&str; 9] = [
    "InitializeStatus",
    "InitializePairs",
    "ActivityInitializeStatus",
    "activity",
    "assay",
    "document",
    "system",
    "testitem",
    "target",
];

fn activity_row(id: &str, document: &str, standard_type: &str) -> String {
    let flags = ["false"; 10].join(",");
    format!("{id},assay_{document},{document},m1,t1,{standard_type},{flags},1,,,")
}

fn write_inputs(dir: &Path, rows: &[String]) {
    fs::write(dir.join("status.csv"), STATUS).expect("write status");
    let mut text = format!(
        "activity_chembl_id,assay_chembl_id,document_chembl_id,molecule_chembl_id,\
target_chembl_id,standard_type,{FLAGS},{METRICS}\n"
    );
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    fs::write(dir.join("activities.csv"), text).expect("write activities");
}

fn csv_files(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    fs::read_dir(dir)
        .expect("list output")
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "csv"))
        .map(|path| {
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            (name, fs::read(&path).expect("read table"))
        })
        .collect()
}

#[test]
fn shared_document_run_writes_every_table() {
    let input = tempfile::tempdir().expect("input dir");
    let output = tempfile::tempdir().expect("output dir");
    write_inputs(
        input.path(),
        &[activity_row("a2", "d1", "IC50"), activity_row("a1", "d1", "IC50")],
    );
    let options = PipelineOptions::new(input.path(), output.path());

    let outcome = run_classify(&options).expect("run");
    assert_eq!(outcome.report.tables.len(), 9);
    assert_eq!(outcome.report.sidecars.len(), 9);
    assert_eq!(outcome.summary.pair_count, 1);
    for table in TABLES {
        assert!(output.path().join(format!("{table}.csv")).is_file(), "{table}");
        assert!(output.path().join(format!("{table}.meta.json")).is_file(), "{table}");
    }

    let pairs = fs::read_to_string(output.path().join("InitializePairs.csv")).expect("pairs");
    let rows: Vec<&str> = pairs.lines().skip(1).collect();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].starts_with("a1,a2,same_document,S2,S2,S2,"));

    let summary: RunSummary = serde_json::from_str(
        &fs::read_to_string(output.path().join("run_summary.json")).expect("summary"),
    )
    .expect("parse summary");
    assert_eq!(summary.status_counts.get("S2"), Some(&2));
}

#[test]
fn repeated_runs_write_identical_tables() {
    let input = tempfile::tempdir().expect("input dir");
    let output = tempfile::tempdir().expect("output dir");
    write_inputs(
        input.path(),
        &[
            activity_row("a1", "d1", "IC50"),
            activity_row("a2", "d1", "Ki"),
            activity_row("a3", "d2", "IC50"),
        ],
    );
    let options = PipelineOptions::new(input.path(), output.path());
    run_classify(&options).expect("first run");
    let first = csv_files(output.path());
    run_classify(&options).expect("second run");
    let second = csv_files(output.path());
    assert_eq!(first.len(), 9);
    assert_eq!(first, second);
}

#[test]
fn missing_measurement_is_skipped() {
    let input = tempfile::tempdir().expect("input dir");
    let output = tempfile::tempdir().expect("output dir");
    write_inputs(
        input.path(),
        &[activity_row("a1", "d1", "IC50"), activity_row("a2", "d1", "")],
    );
    let outcome = run_classify(&PipelineOptions::new(input.path(), output.path())).expect("run");
    assert_eq!(outcome.summary.skipped_count(), 1);
    assert_eq!(csv_files(output.path()).len(), 9);
    let status =
        fs::read_to_string(output.path().join("InitializeStatus.csv")).expect("status table");
    assert_eq!(status.lines().count(), 2);
    assert!(status.lines().nth(1).expect("row").starts_with("a1,"));
}

#[test]
fn threshold_breach_writes_nothing() {
    let input = tempfile::tempdir().expect("input dir");
    let output = tempfile::tempdir().expect("output dir");
    write_inputs(
        input.path(),
        &[
            activity_row("a1", "d1", "IC50"),
            activity_row("a2", "d1", ""),
            activity_row("a3", "d1", ""),
        ],
    );
    let mut options = PipelineOptions::new(input.path(), output.path());
    options.runtime.max_malformed_records = 1;
    let error = run_classify(&options).expect_err("threshold");
    assert!(format!("{error:#}").contains("max_malformed_records"));
    let entries = fs::read_dir(output.path()).expect("list").count();
    assert_eq!(entries, 0);
}

#[test]
fn missing_status_file_is_fatal() {
    let input = tempfile::tempdir().expect("input dir");
    let output = tempfile::tempdir().expect("output dir");
    fs::write(input.path().join("activities.csv"), "activity_chembl_id\n").expect("write");
    let error = run_classify(&PipelineOptions::new(input.path(), output.path()))
        .expect_err("missing status.csv");
    assert!(format!("{error:#}").contains("status.csv"));
    assert_eq!(fs::read_dir(output.path()).expect("list").count(), 0);
}

#[test]
fn flags_beat_environment_beat_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = dir.path().join("classify.toml");
    fs::write(
        &config,
        "[io]\ninput_dir = \"from-file\"\noutput_dir = \"from-file-out\"\n\n\
[runtime]\nmax_malformed_records = 5\nfloat_na_fill = 0.5\n\n\
[[pairs.predicates]]\nkind = \"same_assay\"\ninclude_unclassified = false\n",
    )
    .expect("write config");
    let env = vec![
        (
            "CLASSIFY__RUNTIME__MAX_MALFORMED_RECORDS".to_string(),
            "9".to_string(),
        ),
        ("CLASSIFY_OUTPUT_DIR".to_string(), "from-env-out".to_string()),
    ];
    let overrides = ConfigOverrides {
        output_dir: Some("from-flag-out".into()),
        write_meta: Some(false),
        ..ConfigOverrides::default()
    };
    let options = load_config(Some(config.as_path()), env, &overrides).expect("config");
    assert_eq!(options.io.input_dir, Path::new("from-file"));
    assert_eq!(options.io.output_dir, Path::new("from-flag-out"));
    assert!(!options.io.write_meta);
    assert_eq!(options.runtime.max_malformed_records, 9);
    assert!((options.runtime.float_na_fill - 0.5).abs() < f64::EPSILON);
    assert_eq!(options.pairs.predicates.len(), 1);
    assert!(!options.pairs.predicates[0].include_unclassified);
}

#[test]
fn unreadable_config_is_reported() {
    let dir = tempfile::tempdir().expect("temp dir");
    let error = load_config(
        Some(dir.path().join("absent.toml").as_path()),
        Vec::new(),
        &ConfigOverrides::default(),
    )
    .expect_err("absent file");
    assert!(matches!(error, ConfigError::Read { .. }));
}

#[test]
fn malformed_config_is_reported() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = dir.path().join("classify.toml");
    fs::write(&config, "[io\ninput_dir = 1\n").expect("write config");
    let error = load_config(Some(config.as_path()), Vec::new(), &ConfigOverrides::default())
        .expect_err("bad toml");
    assert!(matches!(error, ConfigError::Parse { .. }));
}

#[test]
fn printed_config_shows_effective_values() {
    let mut options = PipelineOptions::new("in", "out");
    options.runtime.max_malformed_records = 3;
    let text = render_config(&options).expect("render");
    assert!(text.contains("[io]"));
    assert!(text.contains("max_malformed_records = 3"));
    assert!(text.contains("kind = \"same_document\""));
}
