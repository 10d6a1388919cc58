pub mod entry;
pub mod error;
pub mod options;
pub mod report;
pub mod table;

pub use entry::{CandidateEntry, CompositeKey, MappingEntry};
pub use error::{ModelError, Result};
pub use options::{
    ContributorSource, DEFAULT_FREQUENCY_SENTINEL, DEFAULT_SHEETS, DEFAULT_TRIGGER_COLUMN,
    ExtractOptions, MappingColumns, ReconcileOptions, WorkspaceLayout,
};
pub use report::{
    CodeAssignment, CodeConflict, DescriptionConflict, KeyConflict, MergeResult, ModalityCode,
    ReconciliationResult, UnmappedRow, ValidationReport,
};
pub use table::Table;
