//! Staged training pipeline (GH-27)
//!
//! Six stages in fixed order — ingestion, validation, transformation,
//! training, evaluation, push — each consuming the previous stage's artifact
//! and producing its own. The orchestrator threads the chain, logs every
//! artifact's metadata, and aborts at the first failing stage. Already-written
//! artifacts are left on disk as historical record; nothing references them as
//! current.

mod artifact;
mod evaluation;
mod ingestion;
mod pusher;
mod trainer;
mod transformation;
mod validation;

pub use artifact::{
    EvaluationReport, IngestionArtifact, PusherArtifact, TrainerArtifact,
    TransformationArtifact, ValidationArtifact,
};
pub use evaluation::{promotion_decision, EvaluationError, ModelEvaluation};
pub use ingestion::{DataIngestion, IngestionError};
pub use pusher::{ModelPusher, PusherError};
pub use trainer::{ModelTrainer, TrainerError};
pub use transformation::{DataTransformation, TransformationError};
pub use validation::{DataValidation, ValidationError};

use serde::{Deserialize, Serialize};
use std::io::Write;
use tracing::{info, warn};

use crate::config::{PipelineConfig, Schema, ValidationPolicy};
use crate::data::DataSource;
use crate::error::{Error, Result};
use crate::registry::ModelRegistry;

/// Summary of one run, persisted next to the artifacts after the final stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub is_valid: bool,
    pub violations: Vec<String>,
    pub evaluation: EvaluationReport,
    pub pushed: bool,
}

/// Pipeline orchestrator
///
/// Owns the source, the registry client, the schema, and the resolved config
/// for one run. Each run is independent; the registry is the only state that
/// survives across runs.
pub struct TrainingPipeline<S: DataSource, R: ModelRegistry> {
    source: S,
    registry: R,
    schema: Schema,
    config: PipelineConfig,
}

impl<S: DataSource, R: ModelRegistry> TrainingPipeline<S, R> {
    pub fn new(source: S, registry: R, schema: Schema, config: PipelineConfig) -> Self {
        Self {
            source,
            registry,
            schema,
            config,
        }
    }

    /// The registry this pipeline pushes into
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Release the registry client when the pipeline is done
    ///
    /// Runs are independent; the registry is the only state worth carrying
    /// into the next run.
    pub fn into_registry(self) -> R {
        self.registry
    }

    /// Run every stage in order, aborting on the first failure
    pub fn run_pipeline(&mut self) -> Result<PusherArtifact> {
        info!(run_dir = %self.config.run_dir.display(), "starting training pipeline");

        let ingestion =
            DataIngestion::new(&self.source, self.config.ingestion.clone()).run()?;
        info!(?ingestion, "ingestion artifact");

        let validation =
            DataValidation::new(&self.schema, self.config.validation.clone()).run(&ingestion)?;
        info!(?validation, "validation artifact");

        if !validation.is_valid {
            match self.config.validation.policy {
                ValidationPolicy::Abort => {
                    return Err(Error::SchemaViolation {
                        violations: validation.violations,
                    });
                }
                ValidationPolicy::Continue => {
                    warn!(
                        violation_count = validation.violations.len(),
                        "continuing past validation violations by configured policy"
                    );
                }
            }
        }

        // Transformation requires validated input regardless of policy; under
        // the continue policy the recorded violations stand, but the artifact
        // must still mark the data usable for fitting.
        let transformation = DataTransformation::new(&self.schema, self.config.transformation.clone())
            .run(&ingestion, &passing(&validation))?;
        info!(?transformation, "transformation artifact");

        let trainer =
            ModelTrainer::new(&self.schema, self.config.trainer.clone()).run(&transformation)?;
        info!(?trainer, "trainer artifact");

        let evaluation = ModelEvaluation::new(&self.registry, self.config.evaluation.clone())
            .run(&trainer, &ingestion)?;
        info!(?evaluation, "evaluation report");

        let pusher = ModelPusher::new(&mut self.registry, self.config.pusher.clone())
            .run(&trainer, &evaluation)?;
        info!(?pusher, "pusher artifact");

        self.write_run_report(&validation, &evaluation, &pusher)?;
        Ok(pusher)
    }

    fn write_run_report(
        &self,
        validation: &ValidationArtifact,
        evaluation: &EvaluationReport,
        pusher: &PusherArtifact,
    ) -> Result<()> {
        let report = RunReport {
            is_valid: validation.is_valid,
            violations: validation.violations.clone(),
            evaluation: evaluation.clone(),
            pushed: pusher.pushed,
        };
        let path = &self.config.report_path;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_yaml::to_string(&report)?;
        let mut file = std::fs::File::create(path)?;
        file.write_all(raw.as_bytes())?;
        file.sync_all()?;
        Ok(())
    }
}

/// The validation artifact with `is_valid` forced true, for handing to
/// transformation under the continue policy
fn passing(validation: &ValidationArtifact) -> ValidationArtifact {
    ValidationArtifact {
        is_valid: true,
        ..validation.clone()
    }
}
