//! Model evaluation stage
//!
//! Re-scores the freshly trained challenger on the held-out raw test split,
//! scores the current production bundle (each bundle through its own paired
//! preprocessing) on the identical records, and decides promotion. A missing
//! production bundle is the normal cold-start case and promotes
//! unconditionally; any other registry failure aborts the run so an outage is
//! never mistaken for a first-run promotion. This stage only decides — it
//! never writes to the registry.

use thiserror::Error;
use tracing::info;

use super::artifact::{EvaluationReport, IngestionArtifact, TrainerArtifact};
use crate::config::EvaluationConfig;
use crate::data::{DataError, InsuranceRecord, Table};
use crate::model::{ModelBundle, ModelError};
use crate::registry::{ModelRegistry, RegistryError};

/// Evaluation stage errors
#[derive(Debug, Error)]
pub enum EvaluationError {
    /// Registry access failed for a reason other than "not found"
    #[error("registry access failed: {0}")]
    Registry(RegistryError),

    #[error("data error: {0}")]
    Data(#[from] DataError),

    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

/// Result type for the evaluation stage
pub type Result<T> = std::result::Result<T, EvaluationError>;

/// The promotion rule, isolated for direct testing
///
/// Promote iff there is no production baseline, or the challenger beats it by
/// at least `threshold`.
pub fn promotion_decision(challenger: f64, production: Option<f64>, threshold: f64) -> bool {
    match production {
        None => true,
        Some(p) => challenger - p >= threshold,
    }
}

/// Model evaluation component
pub struct ModelEvaluation<'r, R: ModelRegistry + ?Sized> {
    registry: &'r R,
    config: EvaluationConfig,
}

impl<'r, R: ModelRegistry + ?Sized> ModelEvaluation<'r, R> {
    pub fn new(registry: &'r R, config: EvaluationConfig) -> Self {
        Self { registry, config }
    }

    /// Score challenger and production on the same test records and decide
    pub fn run(
        &self,
        trainer: &TrainerArtifact,
        ingestion: &IngestionArtifact,
    ) -> Result<EvaluationReport> {
        let test_records =
            InsuranceRecord::from_table(&Table::from_csv_path(&ingestion.test_path)?)?;

        let challenger = ModelBundle::load(&trainer.bundle_path)?;
        let challenger_score = challenger.score(&test_records)?;

        let production_score = match self.registry.get_latest(&self.config.bundle_key) {
            Ok(bytes) => {
                let production = ModelBundle::from_bytes(&bytes)?;
                Some(production.score(&test_records)?)
            }
            Err(RegistryError::NotFound(_)) => None,
            Err(e) => return Err(EvaluationError::Registry(e)),
        };

        let delta = production_score.map(|p| challenger_score - p);
        let promote = promotion_decision(
            challenger_score,
            production_score,
            self.config.promotion_threshold,
        );

        info!(
            challenger_score,
            production_score,
            delta,
            promote,
            threshold = self.config.promotion_threshold,
            "model evaluation complete"
        );

        Ok(EvaluationReport {
            challenger_score,
            production_score,
            delta,
            promote,
        })
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        /// For any challenger no better than production, promotion is false
        #[test]
        fn prop_promotion_conservative(
            p in 0.0f64..1.0,
            handicap in 0.0f64..1.0,
            threshold in 0.001f64..0.5,
        ) {
            let c = p - handicap;
            prop_assert!(!promotion_decision(c, Some(p), threshold));
        }

        /// Promotion happens iff the delta clears the threshold
        #[test]
        fn prop_promotion_iff_delta_clears(
            p in 0.0f64..1.0,
            c in 0.0f64..1.0,
            threshold in 0.001f64..0.5,
        ) {
            let expected = c - p >= threshold;
            prop_assert_eq!(promotion_decision(c, Some(p), threshold), expected);
        }
    }
}
