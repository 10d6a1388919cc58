//! Mapping table ingestion.
//!
//! This crate moves tables between disk and the in-memory [`Table`] model:
//!
//! - **Delimited files**: TSV/CSV chosen by extension, header on the first row
//! - **Atomic writes**: outputs appear only once fully serialized
//! - **Workbook extraction**: curated rows from modality-named sheets
//! - **Typed rows**: mapping and contributor entries read by header name
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use sdmap_ingest::{mapping_entries, read_table};
//! use sdmap_model::MappingColumns;
//!
//! let path = Path::new("out/StudyDescription_mapping_table.tsv");
//! let table = read_table(path)?;
//! let entries = mapping_entries(&table, &MappingColumns::default(), path)?;
//! ```
//!
//! [`Table`]: sdmap_model::Table

mod delimited;
mod entries;
mod error;
mod workbook;

// === Error Types ===
pub use error::{IngestError, Result};

// === Delimited Files ===
pub use delimited::{
    Delimiter, read_table, read_table_with_delimiter, write_table, write_table_with_delimiter,
};

// === Typed Rows ===
pub use entries::{candidate_entries, mapping_entries, reference_entries, unmapped_table};

// === Workbook Extraction ===
pub use workbook::{Extraction, extract_workbook};
