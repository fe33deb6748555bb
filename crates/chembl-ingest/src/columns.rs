//! Legacy header aliases accepted on input.
//!
//! Older exports used custom names (`testitem_chembl_id`, the misspelled
//! `mesurement_type`, bare `activity_id`). Canonical names always win when
//! both are present.

use chembl_model::columns;

const NONE: &[&str] = &[];

pub fn aliases(canonical: &str) -> &'static [&'static str] {
    match canonical {
        columns::ACTIVITY_ID => &["activity_id"],
        columns::ACTIVITY_ID1 => &["activity_id1"],
        columns::ACTIVITY_ID2 => &["activity_id2"],
        columns::ASSAY_ID => &["assay_id"],
        columns::DOCUMENT_ID => &["document_id"],
        columns::TESTITEM_ID => &["testitem_chembl_id", "testitem_id", "test_item.id"],
        columns::TARGET_ID => &["target_id"],
        columns::MEASUREMENT_TYPE => &["mesurement_type", "measurement_type"],
        _ => NONE,
    }
}

/// Pair each canonical name with its aliases.
pub fn with_aliases<'a>(names: &[&'a str]) -> Vec<(&'a str, &'static [&'static str])> {
    names.iter().map(|name| (*name, aliases(name))).collect()
}
