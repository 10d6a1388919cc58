use std::path::PathBuf;

use sdmap_core::SchemaMismatch;
use sdmap_ingest::Extraction;
use sdmap_model::{MergeResult, ReconciliationResult, ValidationReport};

/// One contributor table as seen by a diff run.
#[derive(Debug, Clone)]
pub struct ContributorSummary {
    pub label: String,
    pub path: PathBuf,
    /// `None` when the table was not present.
    pub rows: Option<usize>,
}

#[derive(Debug)]
pub struct DiffResult {
    pub mapping_path: PathBuf,
    pub mapping_rows: usize,
    pub contributors: Vec<ContributorSummary>,
    pub unmapped: ReconciliationResult,
    /// Set only when unmapped rows were written.
    pub output: Option<PathBuf>,
}

impl DiffResult {
    /// No contributor table was present.
    pub fn no_input_data(&self) -> bool {
        self.contributors.iter().all(|c| c.rows.is_none())
    }
}

#[derive(Debug)]
pub struct ValidateResult {
    pub mapping_path: PathBuf,
    pub rows: usize,
    pub report: ValidationReport,
}

#[derive(Debug)]
pub struct MergeSummary {
    pub previous_path: PathBuf,
    /// The previous snapshot existed and was loaded.
    pub previous_loaded: bool,
    pub result: MergeResult,
    pub merged_path: Option<PathBuf>,
}

#[derive(Debug)]
pub struct ExtractResult {
    pub output: PathBuf,
    pub extraction: Extraction,
    pub schema_mismatch: Option<SchemaMismatch>,
    pub merge: Option<MergeSummary>,
}

impl ExtractResult {
    pub fn has_errors(&self) -> bool {
        self.schema_mismatch.is_some()
    }
}
