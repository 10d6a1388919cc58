use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("row {row} has {actual} cells but the table has {expected} columns")]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),
    #[error("column '{0}' not found")]
    ColumnNotFound(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
