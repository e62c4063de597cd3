//! Resolved per-stage pipeline configuration
//!
//! [`PipelineSpec`] is the serde-loadable tunable surface (what a YAML config
//! file may override); [`PipelineConfig`] is the fully resolved form built once
//! per run, with every output path computed up front. The orchestrator owns the
//! resolved config and hands each stage its own section; stages never mutate it
//! and never reconstruct another stage's paths from shared constants.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::error::{ConfigError, Result};
use crate::model::forest::ForestParams;

/// What the orchestrator does when validation reports violations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationPolicy {
    /// Abort the run at the validation stage (default)
    #[default]
    Abort,
    /// Record the violations and keep going
    Continue,
}

/// Tunable options, loadable from YAML with serde defaults for every field
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSpec {
    /// Identifier of the source collection to ingest
    pub source_collection: String,
    /// Root directory for per-run artifact trees
    pub artifact_root: PathBuf,
    /// Root directory of the local model registry
    pub registry_root: PathBuf,
    /// Well-known registry key the deployed bundle lives under
    pub bundle_key: String,
    /// Fraction of rows held out as the test split
    pub split_ratio: f64,
    /// Policy applied when validation reports violations
    pub validation_policy: ValidationPolicy,
    /// Minimum acceptable trainer score; below this the run fails
    pub expected_score: f64,
    /// Score delta a challenger must clear to replace production
    pub promotion_threshold: f64,
    /// Estimator hyperparameters
    pub forest: ForestParams,
    /// Seed for the train/test shuffle
    pub random_seed: u64,
}

impl Default for PipelineSpec {
    fn default() -> Self {
        Self {
            source_collection: "vehicle-insurance-data".to_string(),
            artifact_root: PathBuf::from("artifact"),
            registry_root: PathBuf::from("model_registry"),
            bundle_key: "model-registry/model.json".to_string(),
            split_ratio: 0.25,
            validation_policy: ValidationPolicy::default(),
            expected_score: 0.6,
            promotion_threshold: 0.02,
            forest: ForestParams::default(),
            random_seed: 101,
        }
    }
}

impl PipelineSpec {
    /// Load a spec from a YAML file, falling back to defaults for absent keys
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let spec: PipelineSpec = serde_yaml::from_str(&raw)?;
        spec.check()?;
        Ok(spec)
    }

    fn check(&self) -> Result<()> {
        if !(self.split_ratio > 0.0 && self.split_ratio < 1.0) {
            return Err(ConfigError::InvalidSplitRatio(self.split_ratio));
        }
        Ok(())
    }
}

/// Ingestion stage configuration
#[derive(Debug, Clone)]
pub struct IngestionConfig {
    pub feature_store_path: PathBuf,
    pub train_path: PathBuf,
    pub test_path: PathBuf,
    pub split_ratio: f64,
    pub seed: u64,
}

/// Validation stage configuration
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    pub report_path: PathBuf,
    pub policy: ValidationPolicy,
}

/// Transformation stage configuration
#[derive(Debug, Clone)]
pub struct TransformationConfig {
    pub transformed_train_path: PathBuf,
    pub transformed_test_path: PathBuf,
    pub preprocessor_path: PathBuf,
}

/// Trainer stage configuration
#[derive(Debug, Clone)]
pub struct TrainerConfig {
    pub bundle_path: PathBuf,
    pub expected_score: f64,
    pub forest: ForestParams,
}

/// Evaluation stage configuration
#[derive(Debug, Clone)]
pub struct EvaluationConfig {
    pub promotion_threshold: f64,
    pub bundle_key: String,
}

/// Pusher stage configuration
#[derive(Debug, Clone)]
pub struct PusherConfig {
    pub bundle_key: String,
}

/// Fully resolved configuration for one pipeline run
///
/// Built once at run start by [`PipelineConfig::for_run`]; immutable afterwards.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Per-run artifact directory, keyed by run timestamp
    pub run_dir: PathBuf,
    /// Path of the run report written after the final stage
    pub report_path: PathBuf,
    pub ingestion: IngestionConfig,
    pub validation: ValidationConfig,
    pub transformation: TransformationConfig,
    pub trainer: TrainerConfig,
    pub evaluation: EvaluationConfig,
    pub pusher: PusherConfig,
}

impl PipelineConfig {
    /// Resolve a spec into concrete per-stage paths under
    /// `<artifact_root>/<run_id>/`
    pub fn for_run(spec: &PipelineSpec, run_id: &str) -> Result<Self> {
        spec.check()?;
        let run_dir = spec.artifact_root.join(run_id);

        let ingestion_dir = run_dir.join("data_ingestion");
        let validation_dir = run_dir.join("data_validation");
        let transformation_dir = run_dir.join("data_transformation");
        let trainer_dir = run_dir.join("model_trainer");

        Ok(Self {
            report_path: run_dir.join("report.yaml"),
            ingestion: IngestionConfig {
                feature_store_path: ingestion_dir.join("feature_store").join("data.csv"),
                train_path: ingestion_dir.join("ingested").join("train.csv"),
                test_path: ingestion_dir.join("ingested").join("test.csv"),
                split_ratio: spec.split_ratio,
                seed: spec.random_seed,
            },
            validation: ValidationConfig {
                report_path: validation_dir.join("report.yaml"),
                policy: spec.validation_policy,
            },
            transformation: TransformationConfig {
                transformed_train_path: transformation_dir.join("transformed").join("train.csv"),
                transformed_test_path: transformation_dir.join("transformed").join("test.csv"),
                preprocessor_path: transformation_dir
                    .join("transformed_object")
                    .join("preprocessing.json"),
            },
            trainer: TrainerConfig {
                bundle_path: trainer_dir.join("trained_model").join("model.json"),
                expected_score: spec.expected_score,
                forest: spec.forest.clone(),
            },
            evaluation: EvaluationConfig {
                promotion_threshold: spec.promotion_threshold,
                bundle_key: spec.bundle_key.clone(),
            },
            pusher: PusherConfig {
                bundle_key: spec.bundle_key.clone(),
            },
            run_dir,
        })
    }
}
