//! Reconciliation of contributor combinations against the mapping table.

use std::cmp::Ordering;
use std::collections::HashSet;

use sdmap_model::{
    CandidateEntry, CompositeKey, MappingEntry, ReconcileOptions, ReconciliationResult,
    UnmappedRow,
};
use tracing::debug;

use crate::expand::explode_reference;
use crate::normalize::{normalize, strip_whitespace};

/// Bring contributor rows into key form: StudyDescription normalized,
/// Modality whitespace-stripped (case is kept).
pub fn prepare_candidates(candidates: &[CandidateEntry]) -> Vec<CandidateEntry> {
    candidates
        .iter()
        .map(|candidate| CandidateEntry {
            study_description: normalize(&candidate.study_description),
            modality: strip_whitespace(&candidate.modality),
            ..candidate.clone()
        })
        .collect()
}

/// Keep the candidates whose key is absent from the exploded reference.
///
/// Both inputs must already be in key form (see [`prepare_candidates`] and
/// [`explode_reference`]). Candidate rows are never merged: a combination
/// reported twice is listed twice.
pub fn reconcile(
    candidates: &[CandidateEntry],
    reference: &[MappingEntry],
    options: &ReconcileOptions,
) -> ReconciliationResult {
    let known: HashSet<CompositeKey> = reference.iter().map(MappingEntry::key).collect();
    let mut rows: Vec<UnmappedRow> = candidates
        .iter()
        .filter(|candidate| !known.contains(&candidate.key()))
        .map(|candidate| UnmappedRow {
            study_description: candidate.study_description.clone(),
            modality: candidate.modality.clone(),
            frequency: candidate
                .frequency
                .clone()
                .unwrap_or_else(|| options.frequency_sentinel.clone()),
            contributor: candidate.contributor.clone(),
        })
        .collect();
    sort_by_frequency(&mut rows);
    debug!(
        candidates = candidates.len(),
        reference_keys = known.len(),
        unmapped = rows.len(),
        "reconciled"
    );
    ReconciliationResult { rows }
}

/// Normalize both sides and reconcile raw contributor rows against the raw
/// mapping table.
pub fn find_unmapped(
    candidates: &[CandidateEntry],
    reference: &[MappingEntry],
    options: &ReconcileOptions,
) -> ReconciliationResult {
    let candidates = prepare_candidates(candidates);
    let exploded = explode_reference(reference);
    reconcile(&candidates, &exploded, options)
}

fn numeric_frequency(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|n| !n.is_nan())
}

/// Order by frequency, highest first.
///
/// Frequencies are compared numerically. Values that are not numbers (the
/// `N/A` sentinel, blanks, free text) go after every numeric value. The sort
/// is stable, so ties keep their input order.
pub fn sort_by_frequency(rows: &mut [UnmappedRow]) {
    rows.sort_by(|a, b| {
        match (
            numeric_frequency(&a.frequency),
            numeric_frequency(&b.frequency),
        ) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}
