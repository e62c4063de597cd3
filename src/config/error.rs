//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading schema or pipeline configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse YAML config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("schema declares no columns")]
    EmptySchema,

    #[error("schema {role} names unknown column: {column}")]
    UnknownColumn { column: String, role: &'static str },

    #[error("split ratio {0} is outside the open interval (0, 1)")]
    InvalidSplitRatio(f64),
}

/// Result type for configuration loading
pub type Result<T> = std::result::Result<T, ConfigError>;
