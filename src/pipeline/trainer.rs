//! Model trainer stage
//!
//! Fits the forest on the transformed training matrix, scores it on the
//! transformed test matrix, and refuses to produce an artifact when the score
//! misses the configured floor. A below-floor model failing the run (rather
//! than warning) is what keeps weak models out of the registry entirely.

use ndarray::Array2;
use thiserror::Error;
use tracing::info;

use super::artifact::{TrainerArtifact, TransformationArtifact};
use crate::config::{Schema, TrainerConfig};
use crate::data::{DataError, Table};
use crate::model::{
    f1_score, BundleMetadata, ModelBundle, ModelError, Preprocessor, RandomForest,
};

/// Trainer stage errors
#[derive(Debug, Error)]
pub enum TrainerError {
    #[error("trained model scored {score:.4}, below the acceptable floor {expected:.4}")]
    BelowThreshold { score: f64, expected: f64 },

    #[error("data error: {0}")]
    Data(#[from] DataError),

    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

/// Result type for the trainer stage
pub type Result<T> = std::result::Result<T, TrainerError>;

/// Model trainer component
pub struct ModelTrainer<'a> {
    schema: &'a Schema,
    config: TrainerConfig,
}

impl<'a> ModelTrainer<'a> {
    pub fn new(schema: &'a Schema, config: TrainerConfig) -> Self {
        Self { schema, config }
    }

    /// Fit, score, gate, and persist the trained bundle
    pub fn run(&self, transformation: &TransformationArtifact) -> Result<TrainerArtifact> {
        let (x_train, y_train) = load_matrix(&transformation.transformed_train_path)?;
        let (x_test, y_test) = load_matrix(&transformation.transformed_test_path)?;

        let forest = RandomForest::fit(&x_train, &y_train, &self.config.forest)?;
        let predictions = forest.predict(&x_test);
        let score = f1_score(&predictions, &y_test);

        info!(
            score,
            expected = self.config.expected_score,
            trees = forest.n_trees(),
            "model training complete"
        );

        if score < self.config.expected_score {
            return Err(TrainerError::BelowThreshold {
                score,
                expected: self.config.expected_score,
            });
        }

        // Bundle the estimator with the exact preprocessing object it was
        // trained behind; the two never travel separately.
        let preprocessor = load_preprocessor(&transformation.preprocessor_path)?;
        let bundle = ModelBundle {
            metadata: BundleMetadata {
                name: "vehicle-insurance-response".to_string(),
                schema_digest: self.schema.digest(),
                trained_at: chrono::Utc::now(),
                score,
            },
            preprocessor,
            forest,
        };
        bundle.save(&self.config.bundle_path)?;

        Ok(TrainerArtifact {
            bundle_path: self.config.bundle_path.clone(),
            score,
        })
    }
}

fn load_preprocessor(path: &std::path::Path) -> Result<Preprocessor> {
    let bytes = std::fs::read(path).map_err(ModelError::Io)?;
    Ok(serde_json::from_slice(&bytes).map_err(ModelError::Serialization)?)
}

/// Read a transformed split back into a feature matrix and label vector
fn load_matrix(path: &std::path::Path) -> Result<(Array2<f64>, Vec<bool>)> {
    let table = Table::from_csv_path(path)?;
    let label_col = table
        .column_index("Response")
        .ok_or_else(|| DataError::MissingColumn("Response".to_string()))?;

    let feature_cols: Vec<usize> = (0..table.n_cols()).filter(|&c| c != label_col).collect();
    let mut x = Array2::zeros((table.n_rows(), feature_cols.len()));
    let mut y = Vec::with_capacity(table.n_rows());

    for (row, cells) in table.rows().iter().enumerate() {
        for (j, &col) in feature_cols.iter().enumerate() {
            let raw = cells.get(col).map(String::as_str).unwrap_or("");
            x[[row, j]] = raw.trim().parse().map_err(|_| DataError::Value {
                column: table.headers()[col].clone(),
                row,
                value: raw.to_string(),
                expected: "a number",
            })?;
        }
        let raw = cells.get(label_col).map(String::as_str).unwrap_or("");
        y.push(match raw.trim() {
            "0" => false,
            "1" => true,
            _ => {
                return Err(TrainerError::Data(DataError::Value {
                    column: "Response".to_string(),
                    row,
                    value: raw.to_string(),
                    expected: "0 or 1",
                }))
            }
        });
    }

    Ok((x, y))
}
