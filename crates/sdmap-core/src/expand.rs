//! Modality expansion.
//!
//! A mapping row authored as `NM, PT` must match contributors reporting
//! `NM,PT`, `NM` or `PT`. Each row therefore yields its joined form plus one
//! row per comma-separated atom.

use std::collections::HashSet;
use std::hash::Hash;

use sdmap_model::MappingEntry;

use crate::normalize::{normalize, strip_whitespace};

/// Joined form followed by one copy per modality atom.
///
/// A single-atom modality yields two identical rows; callers de-duplicate.
/// An empty modality is a one-atom list holding the empty string.
pub fn expand(entry: &MappingEntry) -> Vec<MappingEntry> {
    let joined = strip_whitespace(&entry.modality);
    let mut rows = vec![MappingEntry {
        modality: joined.clone(),
        ..entry.clone()
    }];
    rows.extend(joined.split(',').map(|atom| MappingEntry {
        modality: atom.to_string(),
        ..entry.clone()
    }));
    rows
}

/// Drop repeated items, keeping the first occurrence.
pub fn dedupe<T>(items: impl IntoIterator<Item = T>) -> Vec<T>
where
    T: Clone + Eq + Hash,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Exploded view of the mapping table used for matching.
///
/// Every entry is expanded, its StudyDescription normalized, and exact
/// duplicates removed.
pub fn explode_reference(entries: &[MappingEntry]) -> Vec<MappingEntry> {
    dedupe(entries.iter().flat_map(expand).map(|entry| MappingEntry {
        study_description: normalize(&entry.study_description),
        ..entry
    }))
}
