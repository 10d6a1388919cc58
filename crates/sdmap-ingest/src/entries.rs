//! Conversion between loaded tables and typed mapping rows.

use std::path::Path;

use sdmap_model::{
    CandidateEntry, MappingColumns, MappingEntry, ModelError, ReconciliationResult, Table,
};

use crate::error::{IngestError, Result};

fn require_column(table: &Table, column: &str, path: &Path) -> Result<usize> {
    table
        .column_index(column)
        .ok_or_else(|| IngestError::MissingColumn {
            column: column.to_string(),
            path: path.to_path_buf(),
        })
}

fn optional_cell(row: &[String], idx: Option<usize>) -> String {
    idx.map(|idx| row[idx].clone()).unwrap_or_default()
}

/// Read mapping-table rows. All four mapping columns are required.
pub fn mapping_entries(
    table: &Table,
    columns: &MappingColumns,
    path: &Path,
) -> Result<Vec<MappingEntry>> {
    let description = require_column(table, &columns.study_description, path)?;
    let modality = require_column(table, &columns.modality, path)?;
    let code = require_column(table, &columns.loinc_code, path)?;
    let name = require_column(table, &columns.long_common_name, path)?;
    Ok(table
        .rows
        .iter()
        .map(|row| MappingEntry {
            study_description: row[description].clone(),
            modality: row[modality].clone(),
            loinc_code: row[code].clone(),
            long_common_name: row[name].clone(),
        })
        .collect())
}

/// Read the mapping table as a reconciliation reference.
///
/// Only StudyDescription and Modality are required; code and name are
/// carried along when present.
pub fn reference_entries(
    table: &Table,
    columns: &MappingColumns,
    path: &Path,
) -> Result<Vec<MappingEntry>> {
    let description = require_column(table, &columns.study_description, path)?;
    let modality = require_column(table, &columns.modality, path)?;
    let code = table.column_index(&columns.loinc_code);
    let name = table.column_index(&columns.long_common_name);
    Ok(table
        .rows
        .iter()
        .map(|row| MappingEntry {
            study_description: row[description].clone(),
            modality: row[modality].clone(),
            loinc_code: optional_cell(row, code),
            long_common_name: optional_cell(row, name),
        })
        .collect())
}

/// Read contributor rows, stamping each with `contributor`.
///
/// The frequency column is optional; blank frequency cells are treated as
/// not reported.
pub fn candidate_entries(
    table: &Table,
    columns: &MappingColumns,
    contributor: &str,
    path: &Path,
) -> Result<Vec<CandidateEntry>> {
    let description = require_column(table, &columns.study_description, path)?;
    let modality = require_column(table, &columns.modality, path)?;
    let frequency = table.column_index(&columns.frequency);
    Ok(table
        .rows
        .iter()
        .map(|row| CandidateEntry {
            study_description: row[description].clone(),
            modality: row[modality].clone(),
            frequency: frequency
                .map(|idx| row[idx].trim())
                .filter(|value| !value.is_empty())
                .map(str::to_string),
            contributor: contributor.to_string(),
        })
        .collect())
}

/// Lay out unmapped rows as `StudyDescription, Modality, frequency, Contributor`.
pub fn unmapped_table(
    result: &ReconciliationResult,
    columns: &MappingColumns,
) -> std::result::Result<Table, ModelError> {
    let mut table = Table::new(columns.unmapped_header())?;
    for row in &result.rows {
        table.push_row(vec![
            row.study_description.clone(),
            row.modality.clone(),
            row.frequency.clone(),
            row.contributor.clone(),
        ])?;
    }
    Ok(table)
}
