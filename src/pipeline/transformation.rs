//! Data transformation stage
//!
//! Parses the raw splits into typed records (typing happens here, once),
//! fits the preprocessing transform on the training split only, applies the
//! fitted transform to both splits, and persists the transformed matrices plus
//! the serialized preprocessing object. The test split never influences the
//! fit; that is the leakage invariant this stage exists to protect.

use std::io::Write;
use thiserror::Error;
use tracing::info;

use super::artifact::{IngestionArtifact, TransformationArtifact, ValidationArtifact};
use crate::config::{Schema, TransformationConfig};
use crate::data::{DataError, InsuranceRecord, Table};
use crate::model::{extract_labels, ModelError, Preprocessor, FEATURE_NAMES};

/// Transformation stage errors
#[derive(Debug, Error)]
pub enum TransformationError {
    #[error("validation did not pass; transformation refuses unvalidated input")]
    UpstreamInvalid,

    #[error("data error: {0}")]
    Data(#[from] DataError),

    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the transformation stage
pub type Result<T> = std::result::Result<T, TransformationError>;

/// Data transformation component
pub struct DataTransformation<'a> {
    schema: &'a Schema,
    config: TransformationConfig,
}

impl<'a> DataTransformation<'a> {
    pub fn new(schema: &'a Schema, config: TransformationConfig) -> Self {
        Self { schema, config }
    }

    /// Fit on train, apply to both, persist matrices and the fitted object
    pub fn run(
        &self,
        ingestion: &IngestionArtifact,
        validation: &ValidationArtifact,
    ) -> Result<TransformationArtifact> {
        if !validation.is_valid {
            return Err(TransformationError::UpstreamInvalid);
        }

        let train_records = InsuranceRecord::from_table(&Table::from_csv_path(
            &ingestion.train_path,
        )?)?;
        let test_records =
            InsuranceRecord::from_table(&Table::from_csv_path(&ingestion.test_path)?)?;

        // Fit exclusively on the training split
        let preprocessor = Preprocessor::fit(&train_records, self.schema)?;

        write_transformed(
            &preprocessor,
            &train_records,
            &self.config.transformed_train_path,
        )?;
        write_transformed(
            &preprocessor,
            &test_records,
            &self.config.transformed_test_path,
        )?;
        write_preprocessor(&preprocessor, &self.config.preprocessor_path)?;

        info!(
            train_rows = train_records.len(),
            test_rows = test_records.len(),
            features = FEATURE_NAMES.len(),
            "data transformation complete"
        );

        Ok(TransformationArtifact {
            transformed_train_path: self.config.transformed_train_path.clone(),
            transformed_test_path: self.config.transformed_test_path.clone(),
            preprocessor_path: self.config.preprocessor_path.clone(),
            feature_count: FEATURE_NAMES.len(),
        })
    }
}

/// Persist a transformed split as CSV: feature columns then the target
fn write_transformed(
    preprocessor: &Preprocessor,
    records: &[InsuranceRecord],
    path: &std::path::Path,
) -> Result<()> {
    let labels = extract_labels(records)?;

    let mut headers: Vec<String> = FEATURE_NAMES.iter().map(|&f| f.to_string()).collect();
    headers.push("Response".to_string());

    let rows = records
        .iter()
        .zip(labels.iter())
        .map(|(record, &label)| {
            let mut cells: Vec<String> = preprocessor
                .transform_record(record)
                .into_iter()
                .map(|v| v.to_string())
                .collect();
            cells.push(u8::from(label).to_string());
            cells
        })
        .collect();

    Table::new(headers, rows).write_csv_path(path)?;
    Ok(())
}

fn write_preprocessor(preprocessor: &Preprocessor, path: &std::path::Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let bytes = serde_json::to_vec_pretty(preprocessor).map_err(ModelError::from)?;
    let mut file = std::fs::File::create(path)?;
    file.write_all(&bytes)?;
    file.sync_all()?;
    Ok(())
}
