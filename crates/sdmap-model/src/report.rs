//! Outputs of reconciliation, validation and merging.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::entry::CompositeKey;
use crate::table::Table;

/// A contributor combination with no counterpart in the mapping table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmappedRow {
    #[serde(rename = "StudyDescription")]
    pub study_description: String,
    #[serde(rename = "Modality")]
    pub modality: String,
    pub frequency: String,
    #[serde(rename = "Contributor")]
    pub contributor: String,
}

/// Unmapped rows, ordered by frequency descending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    pub rows: Vec<UnmappedRow>,
}

impl ReconciliationResult {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn keys(&self) -> BTreeSet<CompositeKey> {
        self.rows
            .iter()
            .map(|row| CompositeKey::new(&row.study_description, &row.modality))
            .collect()
    }
}

/// A (code, name) pair as authored in the mapping table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CodeAssignment {
    pub loinc_code: String,
    pub long_common_name: String,
}

/// One composite key mapped to more than one code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyConflict {
    pub key: CompositeKey,
    pub assignments: BTreeSet<CodeAssignment>,
}

/// One code carrying more than one canonical name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeConflict {
    pub loinc_code: String,
    pub long_common_names: BTreeSet<String>,
}

/// A (modality, code) pair seen for a description.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModalityCode {
    pub modality: String,
    pub loinc_code: String,
}

/// One description mapped to several codes across modalities. Advisory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionConflict {
    pub study_description: String,
    pub codes: BTreeSet<ModalityCode>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub passed: bool,
    pub key_conflicts: Vec<KeyConflict>,
    pub code_conflicts: Vec<CodeConflict>,
    pub description_conflicts: Vec<DescriptionConflict>,
}

impl ValidationReport {
    /// Build a report; `passed` is derived from the hard-failure lists.
    pub fn new(
        key_conflicts: Vec<KeyConflict>,
        code_conflicts: Vec<CodeConflict>,
        description_conflicts: Vec<DescriptionConflict>,
    ) -> Self {
        Self {
            passed: key_conflicts.is_empty() && code_conflicts.is_empty(),
            key_conflicts,
            code_conflicts,
            description_conflicts,
        }
    }

    pub fn error_count(&self) -> usize {
        self.key_conflicts.len() + self.code_conflicts.len()
    }

    pub fn warning_count(&self) -> usize {
        self.description_conflicts.len()
    }
}

/// Result of comparing a freshly extracted batch with the previous snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeResult {
    pub merged: Table,
    pub duplicates: Table,
    pub unique_new: Table,
}
