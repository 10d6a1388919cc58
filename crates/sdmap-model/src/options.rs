//! Configuration for reconciliation, extraction and the on-disk layout.
//!
//! Every default the tool relies on lives here so components receive their
//! configuration explicitly instead of reading module constants.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Frequency written for candidates that did not report one.
pub const DEFAULT_FREQUENCY_SENTINEL: &str = "N/A";

/// Workbook column whose non-empty cells select rows for extraction.
pub const DEFAULT_TRIGGER_COLUMN: &str = "LOINC LCN";

/// Modality-named sheets scanned by default.
pub const DEFAULT_SHEETS: [&str; 8] = ["XR", "CT", "MR", "NM,PT", "US", "MG", "XA", "RF"];

/// Column headers used by the mapping table and the generated files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingColumns {
    pub study_description: String,
    pub modality: String,
    pub loinc_code: String,
    pub long_common_name: String,
    pub frequency: String,
    pub contributor: String,
    pub source_sheet: String,
}

impl Default for MappingColumns {
    fn default() -> Self {
        Self {
            study_description: "StudyDescription".to_string(),
            modality: "Modality".to_string(),
            loinc_code: "LOINC code".to_string(),
            long_common_name: "L-Long Common Name".to_string(),
            frequency: "frequency".to_string(),
            contributor: "Contributor".to_string(),
            source_sheet: "Source_Sheet".to_string(),
        }
    }
}

impl MappingColumns {
    /// Header of the unmapped-combinations file.
    pub fn unmapped_header(&self) -> [&str; 4] {
        [
            self.study_description.as_str(),
            self.modality.as_str(),
            self.frequency.as_str(),
            self.contributor.as_str(),
        ]
    }

    /// Columns kept in an extracted mapping batch, in output order.
    pub fn extracted_columns(&self) -> [&str; 4] {
        [
            self.modality.as_str(),
            self.study_description.as_str(),
            self.loinc_code.as_str(),
            self.long_common_name.as_str(),
        ]
    }

    /// Legacy workbook headers and the canonical names they are renamed to.
    pub fn legacy_aliases(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("Suggested LOINC code", self.loinc_code.as_str()),
            ("LONIC code", self.loinc_code.as_str()),
            ("LOINC LCN", self.long_common_name.as_str()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileOptions {
    pub frequency_sentinel: String,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            frequency_sentinel: DEFAULT_FREQUENCY_SENTINEL.to_string(),
        }
    }
}

impl ReconcileOptions {
    #[must_use]
    pub fn with_frequency_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.frequency_sentinel = sentinel.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractOptions {
    /// Rows are kept when this column is non-empty.
    pub target_column: String,
    /// Sheets to scan, in order.
    pub sheets: Vec<String>,
    pub columns: MappingColumns,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            target_column: DEFAULT_TRIGGER_COLUMN.to_string(),
            sheets: DEFAULT_SHEETS.iter().map(|s| (*s).to_string()).collect(),
            columns: MappingColumns::default(),
        }
    }
}

impl ExtractOptions {
    #[must_use]
    pub fn with_target_column(mut self, column: impl Into<String>) -> Self {
        self.target_column = column.into();
        self
    }

    #[must_use]
    pub fn with_sheets<I, S>(mut self, sheets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sheets = sheets.into_iter().map(Into::into).collect();
        self
    }
}

/// A contributor table and the label stamped on its rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributorSource {
    pub label: String,
    /// Relative paths are resolved against the workspace root.
    pub path: PathBuf,
}

impl ContributorSource {
    pub fn new(label: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
        }
    }
}

/// File layout of a mapping workspace (`in/`, `out/`, `pending/`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceLayout {
    pub root: PathBuf,
    pub mapping_file: PathBuf,
    pub diff_file: PathBuf,
    pub contributors: Vec<ContributorSource>,
}

impl Default for WorkspaceLayout {
    fn default() -> Self {
        Self::new(".")
    }
}

impl WorkspaceLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            mapping_file: PathBuf::from("out/StudyDescription_mapping_table.tsv"),
            diff_file: PathBuf::from("pending/StudyDescription_diffs.csv"),
            contributors: vec![ContributorSource::new(
                "Gen3",
                "in/StudyDescriptions_Gen3.tsv",
            )],
        }
    }

    /// Resolve a layout path against the root (absolute paths pass through).
    pub fn resolve(&self, path: &std::path::Path) -> PathBuf {
        self.root.join(path)
    }

    pub fn mapping_path(&self) -> PathBuf {
        self.resolve(&self.mapping_file)
    }

    pub fn diff_path(&self) -> PathBuf {
        self.resolve(&self.diff_file)
    }
}
