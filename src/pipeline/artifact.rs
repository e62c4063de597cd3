//! Stage artifacts
//!
//! Each stage returns a plain record of the locations it durably wrote plus
//! minimal metadata. Artifacts form a strict linear chain; a later stage reads
//! upstream artifacts but never mutates them, and no stage ever returns an
//! artifact referencing a partial write.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::registry::ModelVersion;

/// Output of the ingestion stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestionArtifact {
    /// Verbatim snapshot of the source feed
    pub feature_store_path: PathBuf,
    pub train_path: PathBuf,
    pub test_path: PathBuf,
    pub train_rows: usize,
    pub test_rows: usize,
}

/// Output of the validation stage
///
/// Violations are recorded, not thrown: the orchestrator decides, per
/// configured policy, whether a failed validation aborts the chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationArtifact {
    pub is_valid: bool,
    pub violations: Vec<String>,
    pub report_path: PathBuf,
}

/// Output of the transformation stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformationArtifact {
    pub transformed_train_path: PathBuf,
    pub transformed_test_path: PathBuf,
    /// Serialized fitted preprocessing object
    pub preprocessor_path: PathBuf,
    pub feature_count: usize,
}

/// Output of the trainer stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainerArtifact {
    /// Serialized bundle: estimator plus its paired preprocessing object
    pub bundle_path: PathBuf,
    /// Acceptance metric achieved on the held-out test split
    pub score: f64,
}

/// Output of the evaluation stage: both scores and the promotion decision
///
/// Never persisted on its own; it only survives inside the run report written
/// alongside the pusher artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub challenger_score: f64,
    /// Score of the current production bundle, absent on a cold start
    pub production_score: Option<f64>,
    /// `challenger − production`, absent when there is no production bundle
    pub delta: Option<f64>,
    pub promote: bool,
}

/// Output of the pusher stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PusherArtifact {
    pub pushed: bool,
    /// Registry version created by the push, when one happened
    pub version: Option<ModelVersion>,
}
