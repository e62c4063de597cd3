//! Trained model bundle
//!
//! An estimator is never valid without the preprocessing transform it was
//! trained against, so the two serialize as one atomic unit. The bundle is the
//! only shape that crosses the registry boundary and the only shape the
//! serving layer loads.

use chrono::{DateTime, Utc};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

use super::error::{ModelError, Result};
use super::forest::RandomForest;
use super::metrics::f1_score;
use super::preprocess::Preprocessor;
use crate::data::InsuranceRecord;

/// Identity and provenance of a trained bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleMetadata {
    /// Model family name
    pub name: String,
    /// Digest of the schema the bundle was trained against
    pub schema_digest: String,
    /// When training finished
    pub trained_at: DateTime<Utc>,
    /// Score achieved on the held-out test split at training time
    pub score: f64,
}

/// Estimator plus its paired preprocessing transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelBundle {
    pub metadata: BundleMetadata,
    pub preprocessor: Preprocessor,
    pub forest: RandomForest,
}

impl ModelBundle {
    /// Serialize to the registry wire form
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Deserialize from the registry wire form
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Write the bundle to a file, creating parent directories as needed
    ///
    /// The file is synced before returning, so a returned `Ok` means the
    /// bundle is durably on disk.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let bytes = self.to_bytes()?;
        let mut file = std::fs::File::create(path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        Ok(())
    }

    /// Load a bundle from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Transform one record through the paired preprocessing object and
    /// predict its response
    pub fn predict(&self, record: &InsuranceRecord) -> bool {
        let features = self.preprocessor.transform_record(record);
        self.forest.predict_row(&features)
    }

    /// F1 of the bundle's predictions over labeled records
    pub fn score(&self, records: &[InsuranceRecord]) -> Result<f64> {
        let labels = extract_labels(records)?;
        let x: Array2<f64> = self.preprocessor.transform(records);
        let predictions = self.forest.predict(&x);
        Ok(f1_score(&predictions, &labels))
    }
}

/// Pull the response labels out of a labeled record set
pub fn extract_labels(records: &[InsuranceRecord]) -> Result<Vec<bool>> {
    records
        .iter()
        .enumerate()
        .map(|(row, r)| r.response.ok_or(ModelError::Unlabeled { row }))
        .collect()
}
