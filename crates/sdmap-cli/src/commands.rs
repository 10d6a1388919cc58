use std::path::Path;

use anyhow::{Context, Result, bail};
use sdmap_core::{check_columns, find_unmapped, merge_with_previous};
use sdmap_ingest::{
    candidate_entries, extract_workbook, mapping_entries, read_table, reference_entries,
    unmapped_table, write_table,
};
use sdmap_model::{
    CandidateEntry, MappingColumns, ReconcileOptions, ReconciliationResult, Table,
    WorkspaceLayout,
};
use sdmap_validate::validate_mapping;
use tracing::{debug, info, info_span, warn};

use crate::cli::{DiffArgs, ExtractArgs, ValidateArgs};
use crate::types::{
    ContributorSummary, DiffResult, ExtractResult, MergeSummary, ValidateResult,
};

fn ensure_root(root: &Path) -> Result<()> {
    if !root.exists() {
        bail!("workspace root does not exist: {}", root.display());
    }
    if !root.is_dir() {
        bail!("workspace root is not a directory: {}", root.display());
    }
    Ok(())
}

fn load_table(path: &Path, what: &str) -> Result<Table> {
    read_table(path).with_context(|| format!("load {what} {}", path.display()))
}

/// Load every present contributor table; absent ones are logged and skipped.
fn load_contributors(
    layout: &WorkspaceLayout,
    columns: &MappingColumns,
) -> Result<(Vec<CandidateEntry>, Vec<ContributorSummary>)> {
    let mut candidates = Vec::new();
    let mut summaries = Vec::with_capacity(layout.contributors.len());
    for source in &layout.contributors {
        let path = layout.resolve(&source.path);
        if !path.is_file() {
            warn!(
                contributor = %source.label,
                path = %path.display(),
                "contributor table not found, skipping"
            );
            summaries.push(ContributorSummary {
                label: source.label.clone(),
                path,
                rows: None,
            });
            continue;
        }
        let table = load_table(&path, "contributor table")?;
        let entries = candidate_entries(&table, columns, &source.label, &path)?;
        info!(
            contributor = %source.label,
            rows = entries.len(),
            "loaded contributor table"
        );
        summaries.push(ContributorSummary {
            label: source.label.clone(),
            path,
            rows: Some(entries.len()),
        });
        candidates.extend(entries);
    }
    Ok((candidates, summaries))
}

/// Previous snapshot, or `None` when the file is missing or has no header.
fn load_previous(path: &Path) -> Result<Option<Table>> {
    if !path.is_file() {
        warn!(
            path = %path.display(),
            "previous mapping not found, treating it as empty"
        );
        return Ok(None);
    }
    let table = load_table(path, "previous mapping")?;
    if table.columns.is_empty() {
        warn!(
            path = %path.display(),
            "previous mapping has no header, treating it as absent"
        );
        return Ok(None);
    }
    info!(rows = table.len(), "loaded previous mapping");
    Ok(Some(table))
}

pub fn run_diff(args: &DiffArgs) -> Result<DiffResult> {
    let span = info_span!("diff", root = %args.root.display());
    let _guard = span.enter();
    ensure_root(&args.root)?;

    let layout = args.layout();
    let columns = MappingColumns::default();
    let options =
        ReconcileOptions::default().with_frequency_sentinel(args.frequency_sentinel.clone());

    let mapping_path = layout.mapping_path();
    let mapping = load_table(&mapping_path, "mapping table")?;
    let reference = reference_entries(&mapping, &columns, &mapping_path)?;
    info!(rows = reference.len(), "loaded mapping table");

    let (candidates, contributors) = load_contributors(&layout, &columns)?;
    let mut result = DiffResult {
        mapping_path,
        mapping_rows: reference.len(),
        contributors,
        unmapped: ReconciliationResult::default(),
        output: None,
    };
    if result.no_input_data() {
        info!("no input data to process");
        return Ok(result);
    }

    result.unmapped = find_unmapped(&candidates, &reference, &options);
    info!(
        candidates = candidates.len(),
        unmapped = result.unmapped.len(),
        "reconciled contributor data"
    );
    if result.unmapped.is_empty() {
        return Ok(result);
    }

    let output = layout.diff_path();
    let table = unmapped_table(&result.unmapped, &columns).context("build unmapped table")?;
    write_table(&output, &table)
        .with_context(|| format!("write unmapped combinations {}", output.display()))?;
    info!(path = %output.display(), rows = table.len(), "wrote unmapped combinations");
    result.output = Some(output);
    Ok(result)
}

pub fn run_validate(args: &ValidateArgs) -> Result<ValidateResult> {
    let span = info_span!("validate", root = %args.root.display());
    let _guard = span.enter();
    ensure_root(&args.root)?;

    let mapping_path = args.layout().mapping_path();
    let table = load_table(&mapping_path, "mapping table")?;
    let entries = mapping_entries(&table, &MappingColumns::default(), &mapping_path)?;
    let report = validate_mapping(&entries);
    Ok(ValidateResult {
        mapping_path,
        rows: entries.len(),
        report,
    })
}

pub fn run_extract(args: &ExtractArgs) -> Result<ExtractResult> {
    let span = info_span!("extract", workbook = %args.workbook.display());
    let _guard = span.enter();

    let options = args.options();
    let extraction = extract_workbook(&args.workbook, &options)?;
    write_table(&args.output, &extraction.table)
        .with_context(|| format!("write extracted mapping {}", args.output.display()))?;
    info!(
        path = %args.output.display(),
        rows = extraction.table.len(),
        "wrote extracted mapping"
    );

    let mut result = ExtractResult {
        output: args.output.clone(),
        extraction,
        schema_mismatch: None,
        merge: None,
    };
    let Some(previous_path) = &args.previous else {
        return Ok(result);
    };

    let previous = load_previous(previous_path)?;

    if let Some(previous) = &previous
        && let Err(mismatch) = check_columns(&result.extraction.table, previous)
    {
        warn!(%mismatch, "skipping merge");
        result.schema_mismatch = Some(mismatch);
        return Ok(result);
    }

    let merge = merge_with_previous(&result.extraction.table, previous.as_ref());
    for row in &merge.duplicates.rows {
        warn!(row = %row.join(" | "), "row already present in previous mapping");
    }
    debug!(unique_new = merge.unique_new.len(), "compared with previous mapping");

    let merged_path = match &args.merged {
        Some(path) => {
            write_table(path, &merge.merged)
                .with_context(|| format!("write merged mapping {}", path.display()))?;
            info!(path = %path.display(), rows = merge.merged.len(), "wrote merged mapping");
            Some(path.clone())
        }
        None => None,
    };
    result.merge = Some(MergeSummary {
        previous_path: previous_path.clone(),
        previous_loaded: previous.is_some(),
        result: merge,
        merged_path,
    });
    Ok(result)
}
