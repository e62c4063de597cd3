//! Model layer error types

use thiserror::Error;

/// Errors from preprocessing, estimator, and bundle handling
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("transform requires unknown column: {0}")]
    UnknownColumn(String),

    #[error("record {row} carries no response label")]
    Unlabeled { row: usize },

    #[error("cannot fit on an empty training set")]
    EmptyTrainingSet,
}

/// Result type for model operations
pub type Result<T> = std::result::Result<T, ModelError>;
