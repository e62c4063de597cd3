//! Crate-level error type
//!
//! Each stage keeps its own error enum; this wrapper is what
//! [`run_pipeline`](crate::pipeline::TrainingPipeline::run_pipeline) surfaces
//! to its caller. The orchestrator never catches and continues past a stage
//! failure — the first failing stage aborts the rest of the chain.

use thiserror::Error;

use crate::config::ConfigError;
use crate::pipeline::{
    EvaluationError, IngestionError, PusherError, TrainerError, TransformationError,
    ValidationError,
};

/// Top-level pipeline errors
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("ingestion failed: {0}")]
    Ingestion(#[from] IngestionError),

    #[error("validation stage failed: {0}")]
    Validation(#[from] ValidationError),

    /// Validation completed and found violations, under the abort policy
    #[error("data failed schema validation with {} violation(s); first: {}",
        .violations.len(),
        .violations.first().map(String::as_str).unwrap_or("none"))]
    SchemaViolation { violations: Vec<String> },

    #[error("transformation failed: {0}")]
    Transformation(#[from] TransformationError),

    #[error("training failed: {0}")]
    Trainer(#[from] TrainerError),

    #[error("evaluation failed: {0}")]
    Evaluation(#[from] EvaluationError),

    #[error("push failed: {0}")]
    Pusher(#[from] PusherError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize run report: {0}")]
    Report(#[from] serde_yaml::Error),
}

/// Result type for pipeline-level operations
pub type Result<T> = std::result::Result<T, Error>;
