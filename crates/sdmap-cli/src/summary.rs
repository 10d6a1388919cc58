use std::fmt::Write as _;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use sdmap_model::{ReconciliationResult, ValidationReport};

use crate::types::{DiffResult, ExtractResult, ValidateResult};

/// Rows of the unmapped preview printed after a diff.
const PREVIEW_ROWS: usize = 20;

pub fn print_diff_summary(result: &DiffResult) {
    println!(
        "Mapping table: {} ({} rows)",
        result.mapping_path.display(),
        result.mapping_rows
    );
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Contributor"),
        header_cell("Path"),
        header_cell("Rows"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for contributor in &result.contributors {
        let rows = match contributor.rows {
            Some(rows) => Cell::new(rows),
            None => Cell::new("missing").fg(Color::Yellow),
        };
        table.add_row(vec![
            Cell::new(&contributor.label),
            dim_cell(contributor.path.display()),
            rows,
        ]);
    }
    println!("{table}");

    if result.no_input_data() {
        println!("No input data to process.");
        return;
    }
    match &result.output {
        None => println!("No differences found - all combinations are mapped."),
        Some(path) => {
            print_unmapped_preview(&result.unmapped);
            println!("Unmapped combinations saved to: {}", path.display());
            println!("  Total records: {}", result.unmapped.len());
        }
    }
}

fn print_unmapped_preview(unmapped: &ReconciliationResult) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("StudyDescription"),
        header_cell("Modality"),
        header_cell("Frequency"),
        header_cell("Contributor"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for row in unmapped.rows.iter().take(PREVIEW_ROWS) {
        table.add_row(vec![
            Cell::new(&row.study_description),
            Cell::new(&row.modality),
            Cell::new(&row.frequency),
            Cell::new(&row.contributor),
        ]);
    }
    println!("{table}");
    if unmapped.len() > PREVIEW_ROWS {
        println!("  ... {} more", unmapped.len() - PREVIEW_ROWS);
    }
}

/// Plain-text conflict report, one finding per block.
pub fn render_validation_report(report: &ValidationReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Key conflicts: {}", report.key_conflicts.len());
    for conflict in &report.key_conflicts {
        let _ = writeln!(out, "  {}", conflict.key);
        for assignment in &conflict.assignments {
            let _ = writeln!(
                out,
                "    {} | {}",
                assignment.loinc_code, assignment.long_common_name
            );
        }
    }
    let _ = writeln!(out, "Code conflicts: {}", report.code_conflicts.len());
    for conflict in &report.code_conflicts {
        let _ = writeln!(out, "  {}", conflict.loinc_code);
        for name in &conflict.long_common_names {
            let _ = writeln!(out, "    {name}");
        }
    }
    let _ = writeln!(
        out,
        "Description conflicts (advisory): {}",
        report.description_conflicts.len()
    );
    for conflict in &report.description_conflicts {
        let _ = writeln!(out, "  {}", conflict.study_description);
        for code in &conflict.codes {
            let _ = writeln!(out, "    {} | {}", code.modality, code.loinc_code);
        }
    }
    let verdict = if report.passed { "PASSED" } else { "FAILED" };
    let _ = writeln!(
        out,
        "Result: {verdict} ({} errors, {} warnings)",
        report.error_count(),
        report.warning_count()
    );
    out
}

pub fn print_validation(result: &ValidateResult) {
    eprintln!(
        "Mapping table: {} ({} rows)",
        result.mapping_path.display(),
        result.rows
    );
    eprint!("{}", render_validation_report(&result.report));
}

pub fn print_extract_summary(result: &ExtractResult) {
    let extraction = &result.extraction;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Sheet"), header_cell("Rows")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (sheet, rows) in &extraction.sheet_rows {
        table.add_row(vec![Cell::new(sheet), Cell::new(rows)]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(extraction.table.len()).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    println!("Extraction Summary:");
    println!("  Sheets processed: {}", extraction.sheets_processed);
    println!("  Sheets skipped: {}", extraction.sheets_skipped);
    println!("  Output: {}", result.output.display());

    if let Some(mismatch) = &result.schema_mismatch {
        eprintln!("error: {mismatch}");
        for line in mismatch.details() {
            eprintln!("  {line}");
        }
        return;
    }
    let Some(merge) = &result.merge else {
        return;
    };
    if !merge.previous_loaded {
        println!(
            "Previous mapping {} not found; all rows are new.",
            merge.previous_path.display()
        );
    }
    println!("  Duplicates: {}", merge.result.duplicates.len());
    println!("  New rows: {}", merge.result.unique_new.len());
    if let Some(path) = &merge.merged_path {
        println!(
            "Merged mapping saved to: {} ({} rows)",
            path.display(),
            merge.result.merged.len()
        );
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
