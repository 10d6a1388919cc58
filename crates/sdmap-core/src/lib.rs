//! Reconciliation engine for StudyDescription/Modality mapping tables.
//!
//! Pure crate: receives loaded rows, returns results. No file access.

pub mod expand;
pub mod merge;
pub mod normalize;
pub mod reconcile;

pub use expand::{dedupe, expand, explode_reference};
pub use merge::{SchemaMismatch, check_columns, merge_with_previous};
pub use normalize::{normalize, normalize_opt, strip_whitespace};
pub use reconcile::{find_unmapped, prepare_candidates, reconcile, sort_by_frequency};
