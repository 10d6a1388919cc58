//! Extraction of curated mapping rows from a spreadsheet workbook.
//!
//! Curators fill in a code and long common name per row on modality-named
//! sheets. Rows whose trigger column is non-empty are collected from every
//! requested sheet, legacy headers are renamed to the canonical ones and the
//! result is projected onto the mapping-table columns.
//!
//! A missing, unreadable or trigger-less sheet is skipped with a warning;
//! only a run that yields no rows at all is an error.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};
use sdmap_model::{ExtractOptions, ModelError, Table};
use tracing::{info, warn};

use crate::error::{IngestError, Result};

/// Rows collected from a workbook.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Projected onto `Modality, StudyDescription, LOINC code, L-Long Common Name`.
    pub table: Table,
    /// Sheets that contributed at least one row.
    pub sheets_processed: usize,
    /// Sheets that were missing, unreadable or lacked the trigger column.
    pub sheets_skipped: usize,
    /// Rows kept per contributing sheet, in scan order.
    pub sheet_rows: Vec<(String, usize)>,
}

/// Render a cell the way it reads in the spreadsheet.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Float(n) => {
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{n}")
            }
        }
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Data::DateTime(dt) => format!("{}", dt.as_f64()),
        Data::Error(e) => format!("#{e:?}"),
    }
}

/// Repeated header names get `.1`, `.2`, ... suffixes in order of
/// appearance, so `Notes, Notes` reads as `Notes, Notes.1`.
fn unique_headers(names: Vec<String>) -> Vec<String> {
    let mut used = BTreeSet::new();
    let mut repeats: HashMap<String, usize> = HashMap::new();
    let mut unique = Vec::with_capacity(names.len());
    for name in names {
        let mut count = repeats.get(&name).copied().unwrap_or(0);
        let mut candidate = name.clone();
        while used.contains(&candidate) {
            count += 1;
            candidate = format!("{name}.{count}");
        }
        repeats.insert(name, count);
        used.insert(candidate.clone());
        unique.push(candidate);
    }
    unique
}

/// First row of the used range is the header; blank rows are dropped.
fn range_to_table(range: &Range<Data>) -> std::result::Result<Table, ModelError> {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(Table::default());
    };
    let columns: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let name = cell_to_string(cell);
            if name.is_empty() {
                format!("Unnamed: {idx}")
            } else {
                name
            }
        })
        .collect();
    let mut table = Table::new(unique_headers(columns))?;
    for row in rows {
        let cells: Vec<String> = row.iter().map(cell_to_string).collect();
        if cells.iter().all(String::is_empty) {
            continue;
        }
        table.push_row(cells)?;
    }
    Ok(table)
}

/// Keep rows with a non-empty trigger cell, rename legacy headers and tag the
/// source sheet.
///
/// A legacy header whose canonical name is already on the sheet is dropped;
/// the canonical column wins.
fn filter_sheet(
    mut table: Table,
    trigger: usize,
    sheet: &str,
    options: &ExtractOptions,
) -> std::result::Result<Table, ModelError> {
    table.retain_rows(|row| row.get(trigger).is_some_and(|cell| !cell.trim().is_empty()));
    for (alias, canonical) in options.columns.legacy_aliases() {
        if !table.has_column(alias) {
            continue;
        }
        if table.has_column(canonical) {
            warn!(
                sheet = %sheet,
                legacy = %alias,
                canonical = %canonical,
                "sheet carries both legacy and canonical header, dropping legacy column"
            );
            table.drop_column(alias)?;
        } else {
            table.rename_column(alias, canonical)?;
        }
    }
    let source_sheet = options.columns.source_sheet.as_str();
    if table.has_column(source_sheet) {
        table.drop_column(source_sheet)?;
    }
    table.push_constant_column(source_sheet, sheet)?;
    Ok(table)
}

/// Collect the curated rows of `options.sheets` from the workbook at `path`.
pub fn extract_workbook(path: &Path, options: &ExtractOptions) -> Result<Extraction> {
    if !path.is_file() {
        return Err(IngestError::WorkbookNotFound {
            path: path.to_path_buf(),
        });
    }
    let mut workbook = open_workbook_auto(path).map_err(|e| IngestError::WorkbookOpen {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let available: Vec<String> = workbook.sheet_names().to_vec();
    info!(
        path = %path.display(),
        sheets = available.len(),
        "opened workbook"
    );

    let mut kept = Vec::new();
    let mut sheet_rows = Vec::new();
    let mut skipped = 0usize;
    for sheet in &options.sheets {
        if !available.iter().any(|name| name == sheet) {
            warn!(sheet = %sheet, "sheet not found in workbook, skipping");
            skipped += 1;
            continue;
        }
        let range = match workbook.worksheet_range(sheet) {
            Ok(range) => range,
            Err(error) => {
                warn!(sheet = %sheet, %error, "failed to read sheet, skipping");
                skipped += 1;
                continue;
            }
        };
        let table = match range_to_table(&range) {
            Ok(table) => table,
            Err(error) => {
                warn!(sheet = %sheet, %error, "malformed sheet, skipping");
                skipped += 1;
                continue;
            }
        };
        let Some(trigger) = table.column_index(&options.target_column) else {
            warn!(
                sheet = %sheet,
                column = %options.target_column,
                "trigger column not found in sheet, skipping"
            );
            skipped += 1;
            continue;
        };
        let filtered = match filter_sheet(table, trigger, sheet, options) {
            Ok(filtered) => filtered,
            Err(error) => {
                warn!(sheet = %sheet, %error, "conflicting column names, skipping");
                skipped += 1;
                continue;
            }
        };
        if filtered.is_empty() {
            info!(
                sheet = %sheet,
                column = %options.target_column,
                "no non-empty trigger values in sheet"
            );
            continue;
        }
        info!(sheet = %sheet, rows = filtered.len(), "extracted rows");
        sheet_rows.push((sheet.clone(), filtered.len()));
        kept.push(filtered);
    }

    if kept.is_empty() {
        return Err(IngestError::NoDataExtracted {
            path: path.to_path_buf(),
            column: options.target_column.clone(),
        });
    }

    let combined = Table::concat(&kept);
    let table = combined.select(&options.columns.extracted_columns());
    info!(
        processed = kept.len(),
        skipped,
        rows = table.len(),
        "extraction complete"
    );
    Ok(Extraction {
        table,
        sheets_processed: kept.len(),
        sheets_skipped: skipped,
        sheet_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_floats_lose_decimal_point() {
        assert_eq!(cell_to_string(&Data::Float(42.0)), "42");
        assert_eq!(cell_to_string(&Data::Float(2.5)), "2.5");
        assert_eq!(cell_to_string(&Data::Int(7)), "7");
        assert_eq!(cell_to_string(&Data::String("  CT  ".to_string())), "CT");
        assert_eq!(cell_to_string(&Data::Empty), "");
    }

    #[test]
    fn repeated_headers_get_numbered() {
        let names = ["Notes", "Modality", "Notes", "Notes.1", "Notes"]
            .map(str::to_string)
            .to_vec();
        assert_eq!(
            unique_headers(names),
            vec!["Notes", "Modality", "Notes.1", "Notes.1.1", "Notes.2"]
        );
    }

    #[test]
    fn canonical_header_wins_over_legacy_alias() {
        let mut table = Table::new([
            "StudyDescription",
            "LOINC code",
            "Suggested LOINC code",
            "LOINC LCN",
        ])
        .unwrap();
        table
            .push_row(vec![
                "CT HEAD".to_string(),
                "24725-4".to_string(),
                "30799-1".to_string(),
                "CT Head".to_string(),
            ])
            .unwrap();

        let filtered = filter_sheet(table, 3, "CT", &ExtractOptions::default()).unwrap();
        assert_eq!(
            filtered.columns,
            vec![
                "StudyDescription",
                "LOINC code",
                "L-Long Common Name",
                "Source_Sheet"
            ]
        );
        assert_eq!(filtered.value(0, "LOINC code"), Some("24725-4"));
    }

    #[test]
    fn filter_renames_legacy_headers() {
        let mut table = Table::new(["StudyDescription", "Modality", "LONIC code", "LOINC LCN"])
            .unwrap();
        table
            .push_row(vec![
                "CT HEAD".to_string(),
                "CT".to_string(),
                "24725-4".to_string(),
                "CT Head".to_string(),
            ])
            .unwrap();
        table
            .push_row(vec![
                "CT CHEST".to_string(),
                "CT".to_string(),
                String::new(),
                "  ".to_string(),
            ])
            .unwrap();

        let filtered = filter_sheet(table, 3, "CT", &ExtractOptions::default()).unwrap();
        assert_eq!(
            filtered.columns,
            vec![
                "StudyDescription",
                "Modality",
                "LOINC code",
                "L-Long Common Name",
                "Source_Sheet"
            ]
        );
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.value(0, "Source_Sheet"), Some("CT"));
    }
}
