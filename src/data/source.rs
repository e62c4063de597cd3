//! Data source collaborator seam
//!
//! The pipeline requires only an iterable collection of raw records keyed by a
//! collection identifier. [`CsvSource`] covers file-backed feeds;
//! [`InMemorySource`] backs tests and embedding callers.

use std::path::PathBuf;

use super::error::{DataError, Result};
use super::table::Table;

/// A collection of raw labeled records the ingestion stage can pull
pub trait DataSource {
    /// Opaque identifier of the backing collection
    fn collection(&self) -> &str;

    /// Fetch every record as one raw table
    ///
    /// Failure to reach the collection at all surfaces as
    /// [`DataError::Unavailable`]; an empty feed is a successful fetch of an
    /// empty table and is rejected later by ingestion.
    fn fetch_all(&self) -> Result<Table>;
}

/// CSV-file backed source
#[derive(Debug, Clone)]
pub struct CsvSource {
    collection: String,
    path: PathBuf,
}

impl CsvSource {
    pub fn new(collection: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            collection: collection.into(),
            path: path.into(),
        }
    }
}

impl DataSource for CsvSource {
    fn collection(&self) -> &str {
        &self.collection
    }

    fn fetch_all(&self) -> Result<Table> {
        Table::from_csv_path(&self.path).map_err(|e| DataError::Unavailable {
            collection: self.collection.clone(),
            reason: e.to_string(),
        })
    }
}

/// In-memory source for tests and embedding callers
#[derive(Debug, Clone)]
pub struct InMemorySource {
    collection: String,
    table: Table,
}

impl InMemorySource {
    pub fn new(collection: impl Into<String>, table: Table) -> Self {
        Self {
            collection: collection.into(),
            table,
        }
    }
}

impl DataSource for InMemorySource {
    fn collection(&self) -> &str {
        &self.collection
    }

    fn fetch_all(&self) -> Result<Table> {
        Ok(self.table.clone())
    }
}
