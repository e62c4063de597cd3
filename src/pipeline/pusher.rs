//! Model pusher stage
//!
//! The sole component permitted to write to the registry. On a positive
//! promotion decision it re-reads the trained bundle (verifying it still
//! deserializes) and appends it as a new version under the well-known key;
//! otherwise it records "not pushed" and the registry stays untouched.

use thiserror::Error;
use tracing::info;

use super::artifact::{EvaluationReport, PusherArtifact, TrainerArtifact};
use crate::config::PusherConfig;
use crate::model::{ModelBundle, ModelError};
use crate::registry::{ModelRegistry, RegistryError};

/// Pusher stage errors
#[derive(Debug, Error)]
pub enum PusherError {
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

/// Result type for the pusher stage
pub type Result<T> = std::result::Result<T, PusherError>;

/// Model pusher component
pub struct ModelPusher<'r, R: ModelRegistry + ?Sized> {
    registry: &'r mut R,
    config: PusherConfig,
}

impl<'r, R: ModelRegistry + ?Sized> ModelPusher<'r, R> {
    pub fn new(registry: &'r mut R, config: PusherConfig) -> Self {
        Self { registry, config }
    }

    /// Push the bundle if and only if evaluation decided to promote
    pub fn run(
        &mut self,
        trainer: &TrainerArtifact,
        report: &EvaluationReport,
    ) -> Result<PusherArtifact> {
        if !report.promote {
            info!(
                key = %self.config.bundle_key,
                challenger_score = report.challenger_score,
                "promotion declined; registry unchanged"
            );
            return Ok(PusherArtifact {
                pushed: false,
                version: None,
            });
        }

        let bytes = ModelBundle::load(&trainer.bundle_path)?.to_bytes()?;
        let version = self.registry.put(&self.config.bundle_key, &bytes)?;

        info!(
            key = %self.config.bundle_key,
            version = version.version,
            size = version.size,
            "pushed new model version"
        );

        Ok(PusherArtifact {
            pushed: true,
            version: Some(version),
        })
    }
}
