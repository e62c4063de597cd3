//! Registry error types
//!
//! `NotFound` is a normal outcome on a cold start (no baseline model yet) and
//! must stay distinguishable from access failures: callers treat it as "no
//! production bundle", while any other variant aborts the run so an outage is
//! never mistaken for a first-run promotion.

use thiserror::Error;

/// Registry errors
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("no version found under key: {0}")]
    NotFound(String),

    #[error("version {version} already exists under key {key}")]
    Conflict { key: String, version: u32 },

    #[error("registry IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("registry metadata corrupt: {0}")]
    Corrupt(String),
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;
