//! Validation of whole mapping tables.

use sdmap_model::{CompositeKey, MappingEntry};
use sdmap_validate::validate_mapping;

fn clean_table() -> Vec<MappingEntry> {
    vec![
        MappingEntry::new("CT HEAD", "CT", "24725-4", "CT Head"),
        MappingEntry::new("MR BRAIN", "MR", "24590-2", "MR Brain"),
        MappingEntry::new("PET CT WHOLE BODY", "NM, PT", "44139-4", "PET WB"),
        MappingEntry::new("BRAIN", "MR", "24590-2", "MR Brain"),
    ]
}

#[test]
fn clean_table_passes() {
    let report = validate_mapping(&clean_table());
    assert!(report.passed);
    assert!(report.key_conflicts.is_empty());
    assert!(report.code_conflicts.is_empty());
}

#[test]
fn planted_key_conflict_fails() {
    let mut entries = clean_table();
    entries.push(MappingEntry::new("CT HEAD", "CT", "30799-1", "CT Head WO contrast"));

    let report = validate_mapping(&entries);

    assert!(!report.passed);
    assert_eq!(report.key_conflicts.len(), 1);
    assert_eq!(report.key_conflicts[0].key, CompositeKey::new("CTHEAD", "CT"));
    let codes: Vec<&str> = report.key_conflicts[0]
        .assignments
        .iter()
        .map(|assignment| assignment.loinc_code.as_str())
        .collect();
    assert_eq!(codes, vec!["24725-4", "30799-1"]);
    assert!(report.code_conflicts.is_empty());
}

#[test]
fn planted_code_conflict_fails() {
    let mut entries = clean_table();
    entries.push(MappingEntry::new("HEAD CT", "CT", "24725-4", "CT Brain"));

    let report = validate_mapping(&entries);

    assert!(!report.passed);
    assert!(report.key_conflicts.is_empty());
    assert_eq!(report.code_conflicts.len(), 1);
    let conflict = &report.code_conflicts[0];
    assert_eq!(conflict.loinc_code, "24725-4");
    assert!(conflict.long_common_names.contains("CT Head"));
    assert!(conflict.long_common_names.contains("CT Brain"));
}

#[test]
fn description_conflicts_are_advisory() {
    let mut entries = clean_table();
    entries.push(MappingEntry::new("CT HEAD", "MR", "24590-2", "MR Brain"));

    let report = validate_mapping(&entries);

    assert!(report.passed);
    assert_eq!(report.description_conflicts.len(), 1);
    assert_eq!(report.description_conflicts[0].study_description, "CTHEAD");
    assert_eq!(report.description_conflicts[0].codes.len(), 2);
}
