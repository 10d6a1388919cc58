use std::collections::{BTreeMap, BTreeSet};

use sdmap_core::{normalize, strip_whitespace};
use sdmap_model::{
    CodeAssignment, CodeConflict, CompositeKey, DescriptionConflict, KeyConflict, MappingEntry,
    ModalityCode,
};

fn code_of(entry: &MappingEntry) -> Option<&str> {
    let code = entry.loinc_code.trim();
    (!code.is_empty()).then_some(code)
}

/// Keys (whitespace-stripped Modality, normalized StudyDescription) carrying
/// more than one code.
pub fn find_key_conflicts(entries: &[MappingEntry]) -> Vec<KeyConflict> {
    let mut groups: BTreeMap<CompositeKey, BTreeSet<CodeAssignment>> = BTreeMap::new();
    for entry in entries {
        let Some(code) = code_of(entry) else {
            continue;
        };
        let key = CompositeKey {
            study_description: normalize(&entry.study_description),
            modality: strip_whitespace(&entry.modality),
        };
        groups.entry(key).or_default().insert(CodeAssignment {
            loinc_code: code.to_string(),
            long_common_name: entry.long_common_name.trim().to_string(),
        });
    }
    groups
        .into_iter()
        .filter(|(_, assignments)| {
            let codes: BTreeSet<&str> = assignments
                .iter()
                .map(|assignment| assignment.loinc_code.as_str())
                .collect();
            codes.len() > 1
        })
        .map(|(key, assignments)| KeyConflict { key, assignments })
        .collect()
}

/// Codes described by more than one long common name (compared normalized).
pub fn find_code_conflicts(entries: &[MappingEntry]) -> Vec<CodeConflict> {
    let mut groups: BTreeMap<&str, BTreeMap<String, BTreeSet<String>>> = BTreeMap::new();
    for entry in entries {
        let Some(code) = code_of(entry) else {
            continue;
        };
        groups
            .entry(code)
            .or_default()
            .entry(normalize(&entry.long_common_name))
            .or_default()
            .insert(entry.long_common_name.trim().to_string());
    }
    groups
        .into_iter()
        .filter(|(_, names)| names.len() > 1)
        .map(|(code, names)| CodeConflict {
            loinc_code: code.to_string(),
            long_common_names: names.into_values().flatten().collect(),
        })
        .collect()
}

/// Descriptions mapped to more than one code regardless of modality.
pub fn find_description_conflicts(entries: &[MappingEntry]) -> Vec<DescriptionConflict> {
    let mut groups: BTreeMap<String, BTreeSet<ModalityCode>> = BTreeMap::new();
    for entry in entries {
        let Some(code) = code_of(entry) else {
            continue;
        };
        groups
            .entry(normalize(&entry.study_description))
            .or_default()
            .insert(ModalityCode {
                modality: strip_whitespace(&entry.modality),
                loinc_code: code.to_string(),
            });
    }
    groups
        .into_iter()
        .filter(|(_, codes)| {
            let distinct: BTreeSet<&str> = codes.iter().map(|c| c.loinc_code.as_str()).collect();
            distinct.len() > 1
        })
        .map(|(study_description, codes)| DescriptionConflict {
            study_description,
            codes,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_conflict_ignores_case_and_spacing_of_description() {
        let entries = vec![
            MappingEntry::new("CT Head", "CT", "24725-4", "CT Head"),
            MappingEntry::new("CT  HEAD ", "CT", "30799-1", "CT Head WO contrast"),
        ];
        let conflicts = find_key_conflicts(&entries);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].key, CompositeKey::new("CTHEAD", "CT"));
        assert_eq!(conflicts[0].assignments.len(), 2);
    }

    #[test]
    fn joined_modality_is_not_split() {
        let entries = vec![
            MappingEntry::new("XR CHEST", "XR,CT", "1111-1", "A"),
            MappingEntry::new("XR CHEST", "XR", "2222-2", "B"),
        ];
        assert!(find_key_conflicts(&entries).is_empty());
        // Same description with different codes is still worth a look.
        assert_eq!(find_description_conflicts(&entries).len(), 1);
    }

    #[test]
    fn same_code_same_name_twice_is_fine() {
        let entries = vec![
            MappingEntry::new("CT HEAD", "CT", "24725-4", "CT Head"),
            MappingEntry::new("HEAD CT", "CT", "24725-4", "CT  head"),
        ];
        assert!(find_code_conflicts(&entries).is_empty());
    }

    #[test]
    fn rows_without_code_are_ignored() {
        let entries = vec![
            MappingEntry::new("CT HEAD", "CT", "24725-4", "CT Head"),
            MappingEntry::new("CT HEAD", "CT", " ", ""),
        ];
        assert!(find_key_conflicts(&entries).is_empty());
        assert!(find_code_conflicts(&entries).is_empty());
        assert!(find_description_conflicts(&entries).is_empty());
    }
}
