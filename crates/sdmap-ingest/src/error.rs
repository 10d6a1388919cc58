//! Error types for mapping table ingestion.

use std::path::PathBuf;

use sdmap_model::ModelError;
use thiserror::Error;

/// Errors that can occur while reading or writing tables.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to open or read a file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create, write or replace an output file.
    #[error("failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Delimited Text Errors ===
    /// Malformed delimited text.
    #[error("failed to parse {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Failed to serialize a table.
    #[error("failed to serialize {path}: {source}")]
    CsvWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Header or row layout rejected by the table model.
    #[error("invalid table {path}: {source}")]
    InvalidTable {
        path: PathBuf,
        #[source]
        source: ModelError,
    },

    /// Required column not found.
    #[error("required column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },

    // === Workbook Errors ===
    /// Workbook file not found.
    #[error("workbook not found: {path}")]
    WorkbookNotFound { path: PathBuf },

    /// Workbook could not be opened.
    #[error("failed to open workbook {path}: {message}")]
    WorkbookOpen { path: PathBuf, message: String },

    /// None of the requested sheets produced rows.
    #[error("no rows with a non-empty '{column}' found in any requested sheet of {path}")]
    NoDataExtracted { path: PathBuf, column: String },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("out/StudyDescription_mapping_table.tsv"),
        };
        assert_eq!(
            err.to_string(),
            "file not found: out/StudyDescription_mapping_table.tsv"
        );
    }

    #[test]
    fn test_missing_column_display() {
        let err = IngestError::MissingColumn {
            column: "Modality".to_string(),
            path: PathBuf::from("in/StudyDescriptions_Gen3.tsv"),
        };
        assert_eq!(
            err.to_string(),
            "required column 'Modality' not found in in/StudyDescriptions_Gen3.tsv"
        );
    }
}
