//! Merging a freshly extracted mapping batch into the previous snapshot.

use std::collections::{BTreeSet, HashSet};

use sdmap_model::{MergeResult, Table};
use thiserror::Error;
use tracing::{debug, info};

/// Column layout differs between the new batch and the previous snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "column mismatch between new and previous mapping (new: [{}], previous: [{}])",
    .new_columns.join(", "),
    .previous_columns.join(", ")
)]
pub struct SchemaMismatch {
    pub new_columns: Vec<String>,
    pub previous_columns: Vec<String>,
    pub only_in_new: Vec<String>,
    pub only_in_previous: Vec<String>,
    /// Same column set, different order.
    pub order_mismatch: bool,
}

impl SchemaMismatch {
    /// Human-readable breakdown of the mismatch, one line per finding.
    pub fn details(&self) -> Vec<String> {
        let mut lines = vec![
            format!("New mapping columns: [{}]", self.new_columns.join(", ")),
            format!(
                "Previous mapping columns: [{}]",
                self.previous_columns.join(", ")
            ),
        ];
        if !self.only_in_new.is_empty() {
            lines.push(format!(
                "Columns in new but not in previous: [{}]",
                self.only_in_new.join(", ")
            ));
        }
        if !self.only_in_previous.is_empty() {
            lines.push(format!(
                "Columns in previous but not in new: [{}]",
                self.only_in_previous.join(", ")
            ));
        }
        if self.order_mismatch {
            lines.push("Column order mismatch detected.".to_string());
        }
        lines
    }
}

/// Require identical column names in identical order.
pub fn check_columns(new: &Table, previous: &Table) -> Result<(), SchemaMismatch> {
    if new.columns == previous.columns {
        return Ok(());
    }
    let new_set: BTreeSet<&String> = new.columns.iter().collect();
    let previous_set: BTreeSet<&String> = previous.columns.iter().collect();
    let only_in_new: Vec<String> = new
        .columns
        .iter()
        .filter(|column| !previous_set.contains(column))
        .cloned()
        .collect();
    let only_in_previous: Vec<String> = previous
        .columns
        .iter()
        .filter(|column| !new_set.contains(column))
        .cloned()
        .collect();
    Err(SchemaMismatch {
        new_columns: new.columns.clone(),
        previous_columns: previous.columns.clone(),
        order_mismatch: new_set == previous_set,
        only_in_new,
        only_in_previous,
    })
}

/// Split `new` into rows already present in `previous` and genuinely new
/// rows, and append the new ones to the snapshot.
///
/// Rows are compared on the columns both tables share. Previous rows are
/// never dropped or rewritten. Without a (non-empty) previous snapshot the
/// merged table is the new batch itself.
pub fn merge_with_previous(new: &Table, previous: Option<&Table>) -> MergeResult {
    let empty_like_new = new.empty_like();
    let Some(previous) = previous.filter(|table| !table.is_empty()) else {
        return MergeResult {
            merged: new.clone(),
            duplicates: empty_like_new,
            unique_new: new.clone(),
        };
    };

    let shared: Vec<&str> = new
        .columns
        .iter()
        .map(String::as_str)
        .filter(|column| previous.has_column(column))
        .collect();
    let new_idx: Vec<usize> = shared
        .iter()
        .filter_map(|column| new.column_index(column))
        .collect();
    let previous_idx: Vec<usize> = shared
        .iter()
        .filter_map(|column| previous.column_index(column))
        .collect();

    let known: HashSet<Vec<&str>> = (0..previous.len())
        .map(|row| previous.project_row(row, &previous_idx))
        .collect();

    let mut duplicates = empty_like_new.clone();
    let mut unique_new = empty_like_new;
    for (row_idx, row) in new.rows.iter().enumerate() {
        let key = new.project_row(row_idx, &new_idx);
        if !shared.is_empty() && known.contains(&key) {
            duplicates.rows.push(row.clone());
        } else {
            unique_new.rows.push(row.clone());
        }
    }

    let merged = Table::concat(&[previous.clone(), unique_new.clone()]);
    debug!(shared_columns = shared.len(), "compared batch with snapshot");
    info!(
        previous = previous.len(),
        duplicates = duplicates.len(),
        unique_new = unique_new.len(),
        merged = merged.len(),
        "merged mapping batch"
    );
    MergeResult {
        merged,
        duplicates,
        unique_new,
    }
}
