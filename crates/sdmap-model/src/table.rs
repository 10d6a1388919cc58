//! Plain string tables.
//!
//! Every input of the tool (mapping table, contributor tables, workbook
//! sheets, previous snapshots) is loaded into a [`Table`]: an ordered list of
//! column names and rows of string cells. Absent cells are empty strings.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Create an empty table with the given header.
    pub fn new<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let mut seen = BTreeSet::new();
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(ModelError::DuplicateColumn(column.clone()));
            }
        }
        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    /// Append a row, rejecting rows whose width differs from the header.
    pub fn push_row(&mut self, row: Vec<String>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(ModelError::RowWidth {
                row: self.rows.len(),
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Same header, no rows.
    pub fn empty_like(&self) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: Vec::new(),
        }
    }

    /// Keep only the rows for which `keep` returns true.
    pub fn retain_rows(&mut self, keep: impl FnMut(&Vec<String>) -> bool) {
        self.rows.retain(keep);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell value at `row` for the named column, if both exist.
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx).map(String::as_str)
    }

    /// Rename a column in place. Renaming onto an existing name is an error.
    pub fn rename_column(&mut self, from: &str, to: &str) -> Result<()> {
        let Some(idx) = self.column_index(from) else {
            return Err(ModelError::ColumnNotFound(from.to_string()));
        };
        if from != to && self.has_column(to) {
            return Err(ModelError::DuplicateColumn(to.to_string()));
        }
        self.columns[idx] = to.to_string();
        Ok(())
    }

    /// Add a column holding `value` in every row.
    pub fn push_constant_column(&mut self, name: &str, value: &str) -> Result<()> {
        if self.has_column(name) {
            return Err(ModelError::DuplicateColumn(name.to_string()));
        }
        let width = self.columns.len();
        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.resize(width, String::new());
            row.push(value.to_string());
        }
        Ok(())
    }

    /// Remove a column and its cells.
    pub fn drop_column(&mut self, name: &str) -> Result<()> {
        let Some(idx) = self.column_index(name) else {
            return Err(ModelError::ColumnNotFound(name.to_string()));
        };
        self.columns.remove(idx);
        for row in &mut self.rows {
            if idx < row.len() {
                row.remove(idx);
            }
        }
        Ok(())
    }

    fn cell(row: &[String], idx: usize) -> &str {
        row.get(idx).map_or("", String::as_str)
    }

    /// Project the table onto `columns`, in that order. Names missing from
    /// the table are ignored.
    pub fn select(&self, columns: &[&str]) -> Table {
        let indices: Vec<usize> = columns
            .iter()
            .filter_map(|name| self.column_index(name))
            .collect();
        Table {
            columns: indices.iter().map(|&idx| self.columns[idx].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| {
                    indices
                        .iter()
                        .map(|&idx| Self::cell(row, idx).to_string())
                        .collect()
                })
                .collect(),
        }
    }

    /// Cells of `row` for the given column indices. Cells a row lacks read
    /// as empty.
    pub fn project_row(&self, row: usize, indices: &[usize]) -> Vec<&str> {
        let cells = self.rows.get(row).map_or(&[][..], Vec::as_slice);
        indices.iter().map(|&idx| Self::cell(cells, idx)).collect()
    }

    /// Stack tables vertically over the union of their columns.
    ///
    /// Columns keep first-seen order; cells a table does not have are left
    /// empty.
    pub fn concat(tables: &[Table]) -> Table {
        let mut columns: Vec<String> = Vec::new();
        for table in tables {
            for column in &table.columns {
                if !columns.contains(column) {
                    columns.push(column.clone());
                }
            }
        }
        let mut rows = Vec::new();
        for table in tables {
            let positions: Vec<Option<usize>> = columns
                .iter()
                .map(|column| table.column_index(column))
                .collect();
            for row in &table.rows {
                rows.push(
                    positions
                        .iter()
                        .map(|pos| pos.map(|idx| Self::cell(row, idx)).unwrap_or_default())
                        .map(str::to_string)
                        .collect(),
                );
            }
        }
        Table { columns, rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
        let mut table = Table::new(columns.iter().copied()).unwrap();
        for row in rows {
            table
                .push_row(row.iter().map(|value| (*value).to_string()).collect())
                .unwrap();
        }
        table
    }

    #[test]
    fn rejects_duplicate_columns() {
        let err = Table::new(["Modality", "Modality"]).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateColumn(name) if name == "Modality"));
    }

    #[test]
    fn rejects_ragged_rows() {
        let mut t = Table::new(["A", "B"]).unwrap();
        let err = t.push_row(vec!["1".to_string()]).unwrap_err();
        assert!(matches!(
            err,
            ModelError::RowWidth {
                expected: 2,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn select_reorders_and_skips_unknown() {
        let t = table(&["A", "B", "C"], &[&["1", "2", "3"]]);
        let projected = t.select(&["C", "missing", "A"]);
        assert_eq!(projected.columns, vec!["C", "A"]);
        assert_eq!(projected.rows, vec![vec!["3", "1"]]);
    }

    #[test]
    fn concat_aligns_on_column_union() {
        let left = table(&["A", "B"], &[&["1", "2"]]);
        let right = table(&["B", "C"], &[&["3", "4"]]);
        let combined = Table::concat(&[left, right]);
        assert_eq!(combined.columns, vec!["A", "B", "C"]);
        assert_eq!(combined.rows[0], vec!["1", "2", ""]);
        assert_eq!(combined.rows[1], vec!["", "3", "4"]);
    }

    #[test]
    fn ragged_rows_read_as_empty_cells() {
        let ragged = Table {
            columns: vec!["A".to_string(), "B".to_string()],
            rows: vec![vec!["1".to_string()]],
        };
        assert_eq!(ragged.value(0, "B"), None);
        assert_eq!(ragged.project_row(0, &[0, 1]), vec!["1", ""]);
        assert_eq!(ragged.project_row(5, &[0]), vec![""]);
        assert_eq!(ragged.select(&["B", "A"]).rows, vec![vec!["", "1"]]);
        let combined = Table::concat(&[ragged]);
        assert_eq!(combined.rows, vec![vec!["1", ""]]);
    }

    #[test]
    fn drop_and_retain() {
        let mut t = table(&["A", "B", "C"], &[&["1", "2", "3"], &["", "5", "6"]]);
        t.drop_column("B").unwrap();
        assert_eq!(t.columns, vec!["A", "C"]);
        t.retain_rows(|row| !row[0].is_empty());
        assert_eq!(t.rows, vec![vec!["1", "3"]]);
        assert!(t.empty_like().is_empty());
        assert_eq!(t.empty_like().columns, t.columns);
        assert!(t.drop_column("B").is_err());
    }

    #[test]
    fn rename_refuses_collisions() {
        let mut t = table(&["LOINC LCN", "L-Long Common Name"], &[]);
        assert!(t.rename_column("LOINC LCN", "L-Long Common Name").is_err());
        assert!(t.rename_column("missing", "x").is_err());
    }
}
