//! Data layer error types

use thiserror::Error;

/// Errors from tabular data handling and source access
#[derive(Debug, Error)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("source collection unavailable: {collection}: {reason}")]
    Unavailable { collection: String, reason: String },

    #[error("missing column: {0}")]
    MissingColumn(String),

    #[error("row {row}: column {column} holds {value:?}, expected {expected}")]
    Value {
        column: String,
        row: usize,
        value: String,
        expected: &'static str,
    },
}

/// Result type for data operations
pub type Result<T> = std::result::Result<T, DataError>;
