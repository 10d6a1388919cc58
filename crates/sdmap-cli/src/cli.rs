//! CLI argument definitions for `sdmap`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use sdmap_model::{
    ContributorSource, DEFAULT_FREQUENCY_SENTINEL, DEFAULT_TRIGGER_COLUMN, ExtractOptions,
    WorkspaceLayout,
};

#[derive(Parser)]
#[command(
    name = "sdmap",
    version,
    about = "Reconcile imaging StudyDescription/Modality combinations against a LOINC mapping table",
    long_about = "Reconcile imaging StudyDescription/Modality combinations against a LOINC mapping table.\n\n\
                  Finds contributor combinations that are not mapped yet, checks the mapping\n\
                  table for conflicting assignments and extracts curated rows from workbooks."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List contributor combinations missing from the mapping table.
    Diff(DiffArgs),

    /// Check the mapping table for conflicting assignments.
    Validate(ValidateArgs),

    /// Extract curated mapping rows from a workbook.
    Extract(ExtractArgs),
}

#[derive(Args)]
pub struct DiffArgs {
    /// Workspace root containing `in/`, `out/` and `pending/`.
    #[arg(value_name = "ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Contributor table as LABEL=PATH (repeatable, default Gen3=in/StudyDescriptions_Gen3.tsv).
    #[arg(
        long = "contributor",
        value_name = "LABEL=PATH",
        value_parser = parse_contributor
    )]
    pub contributors: Vec<ContributorSource>,

    /// Mapping table, relative to ROOT.
    #[arg(long = "mapping", value_name = "PATH")]
    pub mapping: Option<PathBuf>,

    /// Unmapped-combinations file, relative to ROOT.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Frequency written for combinations reported without one.
    #[arg(
        long = "frequency-sentinel",
        value_name = "VALUE",
        default_value = DEFAULT_FREQUENCY_SENTINEL
    )]
    pub frequency_sentinel: String,
}

impl DiffArgs {
    pub fn layout(&self) -> WorkspaceLayout {
        let mut layout = WorkspaceLayout::new(&self.root);
        if let Some(mapping) = &self.mapping {
            layout.mapping_file.clone_from(mapping);
        }
        if let Some(output) = &self.output {
            layout.diff_file.clone_from(output);
        }
        if !self.contributors.is_empty() {
            layout.contributors.clone_from(&self.contributors);
        }
        layout
    }
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Workspace root containing `out/`.
    #[arg(value_name = "ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Mapping table, relative to ROOT.
    #[arg(long = "mapping", value_name = "PATH")]
    pub mapping: Option<PathBuf>,

    /// Also print the report as JSON on stdout.
    #[arg(long = "json")]
    pub json: bool,
}

impl ValidateArgs {
    pub fn layout(&self) -> WorkspaceLayout {
        let mut layout = WorkspaceLayout::new(&self.root);
        if let Some(mapping) = &self.mapping {
            layout.mapping_file.clone_from(mapping);
        }
        layout
    }
}

#[derive(Args)]
pub struct ExtractArgs {
    /// Workbook with modality-named sheets.
    #[arg(value_name = "WORKBOOK")]
    pub workbook: PathBuf,

    /// Extracted mapping batch (TSV).
    #[arg(
        long = "output",
        short = 'o',
        value_name = "PATH",
        default_value = "out/extracted_studydescriptions.tsv"
    )]
    pub output: PathBuf,

    /// Rows are kept when this column is non-empty.
    #[arg(
        long = "column",
        short = 'c',
        value_name = "NAME",
        default_value = DEFAULT_TRIGGER_COLUMN
    )]
    pub column: String,

    /// Sheet to scan (repeatable; default XR, CT, MR, "NM,PT", US, MG, XA, RF).
    #[arg(long = "sheets", short = 's', value_name = "NAME")]
    pub sheets: Vec<String>,

    /// Previous mapping snapshot to check for duplicates against.
    #[arg(long = "previous", short = 'p', value_name = "PATH")]
    pub previous: Option<PathBuf>,

    /// Write the previous snapshot plus the new rows here.
    #[arg(
        long = "merged",
        short = 'm',
        value_name = "PATH",
        requires = "previous"
    )]
    pub merged: Option<PathBuf>,
}

impl ExtractArgs {
    pub fn options(&self) -> ExtractOptions {
        let options = ExtractOptions::default().with_target_column(self.column.clone());
        if self.sheets.is_empty() {
            options
        } else {
            options.with_sheets(self.sheets.iter().cloned())
        }
    }
}

/// Parse `LABEL=PATH`.
pub fn parse_contributor(value: &str) -> Result<ContributorSource, String> {
    let (label, path) = value
        .split_once('=')
        .ok_or_else(|| format!("expected LABEL=PATH, got '{value}'"))?;
    let label = label.trim();
    let path = path.trim();
    if label.is_empty() || path.is_empty() {
        return Err(format!("expected LABEL=PATH, got '{value}'"));
    }
    Ok(ContributorSource::new(label, path))
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
