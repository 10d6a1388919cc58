//! Workbook extraction against real xlsx fixtures.

use std::path::{Path, PathBuf};

use rust_xlsxwriter::Workbook;
use sdmap_ingest::{IngestError, extract_workbook};
use sdmap_model::ExtractOptions;
use tempfile::TempDir;

fn add_sheet(workbook: &mut Workbook, name: &str, rows: &[&[&str]]) {
    let sheet = workbook.add_worksheet();
    sheet.set_name(name).unwrap();
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            if !value.is_empty() {
                sheet.write_string(r as u32, c as u16, *value).unwrap();
            }
        }
    }
}

fn save(dir: &Path, workbook: &mut Workbook) -> PathBuf {
    let path = dir.join("pending_StudyDescription_diffs_by_modality.xlsx");
    workbook.save(&path).unwrap();
    path
}

fn curated_workbook(dir: &Path) -> PathBuf {
    let mut workbook = Workbook::new();
    add_sheet(
        &mut workbook,
        "CT",
        &[
            &["StudyDescription", "Modality", "frequency", "Suggested LOINC code", "LOINC LCN"],
            &["CT HEAD W/O CONTRAST", "CT", "120", "30799-1", "CT Head WO contrast"],
            &["CT CHEST", "CT", "80", "", ""],
        ],
    );
    add_sheet(
        &mut workbook,
        "NM,PT",
        &[
            &["StudyDescription", "Modality", "LONIC code", "LOINC LCN"],
            &["PET CT WHOLE BODY", "PT", "44139-4", "PET WB"],
        ],
    );
    add_sheet(
        &mut workbook,
        "MR",
        &[
            &["StudyDescription", "Modality", "notes"],
            &["MR BRAIN", "MR", "pending"],
        ],
    );
    save(dir, &mut workbook)
}

#[test]
fn extracts_rows_with_non_empty_trigger() {
    let dir = TempDir::new().unwrap();
    let path = curated_workbook(dir.path());

    let extraction = extract_workbook(&path, &ExtractOptions::default()).unwrap();

    assert_eq!(
        extraction.table.columns,
        vec!["Modality", "StudyDescription", "LOINC code", "L-Long Common Name"]
    );
    assert_eq!(extraction.table.len(), 2);
    assert_eq!(
        extraction.table.rows[0],
        vec!["CT", "CT HEAD W/O CONTRAST", "30799-1", "CT Head WO contrast"]
    );
    assert_eq!(
        extraction.table.rows[1],
        vec!["PT", "PET CT WHOLE BODY", "44139-4", "PET WB"]
    );
    assert_eq!(extraction.sheets_processed, 2);
    // MR lacks the trigger column; XR, US, MG, XA and RF are absent.
    assert_eq!(extraction.sheets_skipped, 6);
    assert_eq!(
        extraction.sheet_rows,
        vec![("CT".to_string(), 1), ("NM,PT".to_string(), 1)]
    );
}

#[test]
fn custom_sheet_list_and_trigger() {
    let dir = TempDir::new().unwrap();
    let path = curated_workbook(dir.path());

    let options = ExtractOptions::default()
        .with_sheets(["MR"])
        .with_target_column("notes");
    let extraction = extract_workbook(&path, &options).unwrap();

    assert_eq!(extraction.table.columns, vec!["Modality", "StudyDescription"]);
    assert_eq!(extraction.table.rows, vec![vec!["MR", "MR BRAIN"]]);
}

#[test]
fn no_rows_anywhere_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = curated_workbook(dir.path());

    let options = ExtractOptions::default().with_sheets(["MR", "US"]);
    let err = extract_workbook(&path, &options).unwrap_err();
    assert!(matches!(err, IngestError::NoDataExtracted { column, .. } if column == "LOINC LCN"));
}

#[test]
fn missing_workbook_is_fatal() {
    let dir = TempDir::new().unwrap();
    let err = extract_workbook(&dir.path().join("absent.xlsx"), &ExtractOptions::default())
        .unwrap_err();
    assert!(matches!(err, IngestError::WorkbookNotFound { .. }));
}

#[test]
fn unreadable_workbook_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.xlsx");
    std::fs::write(&path, b"not a zip archive").unwrap();
    let err = extract_workbook(&path, &ExtractOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::WorkbookOpen { .. }));
}

#[test]
fn repeated_headers_keep_curated_rows() {
    let dir = TempDir::new().unwrap();
    let mut workbook = Workbook::new();
    add_sheet(
        &mut workbook,
        "CT",
        &[
            &["StudyDescription", "Modality", "Notes", "LOINC code", "LOINC LCN", "Notes"],
            &["CT HEAD", "CT", "reviewed", "24725-4", "CT Head", "again"],
        ],
    );
    let path = save(dir.path(), &mut workbook);

    let extraction =
        extract_workbook(&path, &ExtractOptions::default().with_sheets(["CT"])).unwrap();

    assert_eq!(extraction.sheets_processed, 1);
    assert_eq!(
        extraction.table.rows,
        vec![vec!["CT", "CT HEAD", "24725-4", "CT Head"]]
    );
}

#[test]
fn legacy_code_header_beside_canonical_keeps_canonical() {
    let dir = TempDir::new().unwrap();
    let mut workbook = Workbook::new();
    add_sheet(
        &mut workbook,
        "MR",
        &[
            &["StudyDescription", "Modality", "Suggested LOINC code", "LOINC code", "LOINC LCN"],
            &["MR BRAIN", "MR", "24589-4", "24590-2", "MR Brain"],
        ],
    );
    let path = save(dir.path(), &mut workbook);

    let extraction =
        extract_workbook(&path, &ExtractOptions::default().with_sheets(["MR"])).unwrap();

    assert_eq!(extraction.sheets_skipped, 0);
    assert_eq!(
        extraction.table.rows,
        vec![vec!["MR", "MR BRAIN", "24590-2", "MR Brain"]]
    );
}
