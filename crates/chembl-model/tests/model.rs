//! Tests for chembl-model types.

use chembl_model::{
    ActivityId, EntityLevel, PipelineOptions, PredicateKind, RelationKind, StatusValue,
};

#[test]
fn activity_ids_sort_lexically() {
    let mut ids = vec![
        ActivityId::new("CHEMBL3").expect("id"),
        ActivityId::new(" CHEMBL1 ").expect("id"),
        ActivityId::new("CHEMBL2").expect("id"),
    ];
    ids.sort();
    let names: Vec<&str> = ids.iter().map(ActivityId::as_str).collect();
    assert_eq!(names, vec!["CHEMBL1", "CHEMBL2", "CHEMBL3"]);
}

#[test]
fn entity_levels_expose_key_columns() {
    let keys: Vec<&str> = EntityLevel::ALL.iter().map(EntityLevel::key_column).collect();
    assert_eq!(
        keys,
        vec![
            "activity_chembl_id",
            "assay_chembl_id",
            "document_chembl_id",
            "system_id",
            "molecule_chembl_id",
            "target_chembl_id",
        ]
    );
}

#[test]
fn options_deserialize_with_defaults() {
    let json = r#"{"io": {"input_dir": "in", "output_dir": "out"}}"#;
    let options: PipelineOptions = serde_json::from_str(json).expect("parse options");
    assert_eq!(options.io.separator, ",");
    assert!(options.io.write_meta);
    assert!(options.runtime.fail_on_missing_columns);
    assert_eq!(options.pairs.predicates[0].kind, PredicateKind::SameDocument);
}

#[test]
fn options_reject_unknown_keys() {
    let json = r#"{"io": {"input_dir": "in", "output_dir": "out", "inputdir": "x"}}"#;
    assert!(serde_json::from_str::<PipelineOptions>(json).is_err());
}

#[test]
fn relation_kinds_serialize_snake_case() {
    let json = serde_json::to_string(&RelationKind::SameDocument).expect("serialize");
    assert_eq!(json, "\"same_document\"");
    let status = serde_json::to_string(&StatusValue::unclassified()).expect("serialize");
    assert_eq!(status, "\"unclassified\"");
}
