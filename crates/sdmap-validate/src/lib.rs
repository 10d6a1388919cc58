//! Consistency validation of the mapping table.
//!
//! Three independent checks run over the table as authored. Multi-modality
//! rows are *not* exploded here: `XR,CT` is its own key, so an `XR`-only row
//! with a different code is not a conflict.
//!
//! - **Key conflicts** (hard): one (Modality, StudyDescription) with several codes
//! - **Code conflicts** (hard): one code with several long common names
//! - **Description conflicts** (advisory): one StudyDescription with several
//!   codes across modalities
//!
//! Rows without a code take no part in any check.

mod checks;

pub use checks::{find_code_conflicts, find_description_conflicts, find_key_conflicts};

use sdmap_model::{MappingEntry, ValidationReport};
use tracing::{debug, info, warn};

/// Run every consistency check over `entries`.
pub fn validate_mapping(entries: &[MappingEntry]) -> ValidationReport {
    let key_conflicts = find_key_conflicts(entries);
    let code_conflicts = find_code_conflicts(entries);
    let description_conflicts = find_description_conflicts(entries);
    debug!(rows = entries.len(), "validated mapping table");

    let report = ValidationReport::new(key_conflicts, code_conflicts, description_conflicts);
    if report.passed {
        info!(
            rows = entries.len(),
            advisories = report.warning_count(),
            "mapping table passed validation"
        );
    } else {
        warn!(
            key_conflicts = report.key_conflicts.len(),
            code_conflicts = report.code_conflicts.len(),
            "mapping table failed validation"
        );
    }
    report
}
