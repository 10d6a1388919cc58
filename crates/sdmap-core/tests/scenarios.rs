//! End-to-end reconciliation scenarios.

use sdmap_core::find_unmapped;
use sdmap_model::{CandidateEntry, CompositeKey, MappingEntry, ReconcileOptions};

#[test]
fn unmapped_brain_mr_is_reported_head_ct_is_not() {
    let reference = vec![MappingEntry::new("CT HEAD", "CT", "24725-4", "CT Head")];
    let candidates = vec![
        CandidateEntry::new("CT Head", "CT", "Gen3"),
        CandidateEntry::new("MR BRAIN", "MR", "Gen3"),
    ];

    let result = find_unmapped(&candidates, &reference, &ReconcileOptions::default());

    assert_eq!(result.len(), 1);
    let row = &result.rows[0];
    assert_eq!(row.study_description, "MRBRAIN");
    assert_eq!(row.modality, "MR");
    assert_eq!(row.frequency, "N/A");
    assert_eq!(row.contributor, "Gen3");
}

#[test]
fn atom_matches_joined_reference_entry() {
    let reference = vec![MappingEntry::new(
        "PET CT Whole Body",
        "NM,PT",
        "44139-4",
        "PET WB",
    )];
    let candidates = vec![
        CandidateEntry::new("pet  ct whole body ", "PT", "Gen3"),
        CandidateEntry::new("PET CT WHOLE BODY", "NM", "Gen3"),
        CandidateEntry::new("PET CT WHOLE BODY", "NM, PT", "Gen3"),
    ];

    let result = find_unmapped(&candidates, &reference, &ReconcileOptions::default());

    assert!(result.is_empty(), "unexpected rows: {:?}", result.rows);
}

#[test]
fn spaced_reference_modality_still_matches() {
    let reference = vec![MappingEntry::new("PET CT", "NM, PT", "44139-4", "PET WB")];
    let candidates = vec![CandidateEntry::new("PET CT", "PT", "Gen3")];
    let result = find_unmapped(&candidates, &reference, &ReconcileOptions::default());
    assert!(result.is_empty());
}

#[test]
fn several_contributors_are_ranked_together() {
    let reference = vec![MappingEntry::new("CT HEAD", "CT", "24725-4", "CT Head")];
    let candidates = vec![
        CandidateEntry::new("XR CHEST", "XR", "Gen3").with_frequency("40"),
        CandidateEntry::new("CT HEAD", "CT", "Gen3").with_frequency("900"),
        CandidateEntry::new("US ABDOMEN", "US", "SiteB"),
        CandidateEntry::new("MR KNEE", "MR", "SiteB").with_frequency("310"),
    ];

    let result = find_unmapped(&candidates, &reference, &ReconcileOptions::default());

    let ranked: Vec<(&str, &str, &str)> = result
        .rows
        .iter()
        .map(|row| {
            (
                row.study_description.as_str(),
                row.frequency.as_str(),
                row.contributor.as_str(),
            )
        })
        .collect();
    assert_eq!(
        ranked,
        vec![
            ("MRKNEE", "310", "SiteB"),
            ("XRCHEST", "40", "Gen3"),
            ("USABDOMEN", "N/A", "SiteB"),
        ]
    );
    assert!(
        !result
            .keys()
            .contains(&CompositeKey::new("CTHEAD", "CT"))
    );
}
