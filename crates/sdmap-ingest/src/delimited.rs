//! Delimited text (TSV/CSV) reading and atomic writing.

use std::fs::{self, File};
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use sdmap_model::Table;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{IngestError, Result};

/// Field separator of a delimited file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Tab,
    Comma,
}

impl Delimiter {
    /// `.tsv` and `.tab` files are tab separated, everything else is CSV.
    pub fn from_path(path: &Path) -> Self {
        let is_tab = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("tsv") || ext.eq_ignore_ascii_case("tab"))
            .unwrap_or(false);
        if is_tab { Self::Tab } else { Self::Comma }
    }

    pub fn as_byte(self) -> u8 {
        match self {
            Self::Tab => b'\t',
            Self::Comma => b',',
        }
    }
}

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').trim().to_string()
}

fn open_file(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// Read a delimited file, choosing the separator from its extension.
pub fn read_table(path: &Path) -> Result<Table> {
    read_table_with_delimiter(path, Delimiter::from_path(path))
}

/// Read a delimited file whose first non-blank row is the header.
///
/// Header names are trimmed; data cells are kept exactly as written. Short
/// rows are padded with empty cells, extra cells are dropped and fully blank
/// rows are skipped. An empty file yields an empty table.
pub fn read_table_with_delimiter(path: &Path, delimiter: Delimiter) -> Result<Table> {
    let file = open_file(path)?;
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter.as_byte())
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut table: Option<Table> = None;
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::CsvParse {
            path: path.to_path_buf(),
            source,
        })?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        match table.as_mut() {
            None => {
                let header = Table::new(record.iter().map(normalize_header)).map_err(|source| {
                    IngestError::InvalidTable {
                        path: path.to_path_buf(),
                        source,
                    }
                })?;
                table = Some(header);
            }
            Some(table) => {
                let width = table.columns.len();
                let row: Vec<String> = (0..width)
                    .map(|idx| record.get(idx).map(str::to_string).unwrap_or_default())
                    .collect();
                table.push_row(row).map_err(|source| IngestError::InvalidTable {
                    path: path.to_path_buf(),
                    source,
                })?;
            }
        }
    }

    let table = table.unwrap_or_default();
    debug!(
        path = %path.display(),
        columns = table.columns.len(),
        rows = table.len(),
        "read delimited table"
    );
    Ok(table)
}

/// Write a table, choosing the separator from the target extension.
pub fn write_table(path: &Path, table: &Table) -> Result<()> {
    write_table_with_delimiter(path, table, Delimiter::from_path(path))
}

/// Write a table atomically.
///
/// The rows are serialized into a temporary file next to `path`, which only
/// replaces the target once every row has been written. Missing parent
/// directories are created.
pub fn write_table_with_delimiter(path: &Path, table: &Table, delimiter: Delimiter) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|source| IngestError::FileWrite {
            path: dir.to_path_buf(),
            source,
        })?;
        info!(dir = %dir.display(), "created output directory");
    }

    let write_error = |source| IngestError::FileWrite {
        path: path.to_path_buf(),
        source,
    };
    let csv_error = |source| IngestError::CsvWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut temp = NamedTempFile::new_in(dir).map_err(write_error)?;
    {
        let mut writer = WriterBuilder::new()
            .delimiter(delimiter.as_byte())
            .from_writer(temp.as_file_mut());
        writer.write_record(&table.columns).map_err(csv_error)?;
        for row in &table.rows {
            writer.write_record(row).map_err(csv_error)?;
        }
        writer.flush().map_err(write_error)?;
    }
    temp.as_file_mut().sync_all().map_err(write_error)?;
    temp.persist(path).map_err(|err| write_error(err.error))?;
    debug!(path = %path.display(), rows = table.len(), "wrote table");
    Ok(())
}
