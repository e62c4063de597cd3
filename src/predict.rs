//! Prediction seam for the serving layer
//!
//! The serving collaborator loads the latest promoted bundle once and feeds it
//! single typed records; the bundle applies its paired preprocessing before
//! the estimator runs. Nothing here touches the training pipeline.

use thiserror::Error;

use crate::data::InsuranceRecord;
use crate::model::{BundleMetadata, ModelBundle, ModelError};
use crate::registry::{ModelRegistry, RegistryError};

/// Predictor errors
#[derive(Debug, Error)]
pub enum PredictorError {
    /// No promoted bundle exists yet; train and promote first
    #[error("no deployed model under key {0}")]
    NoDeployedModel(String),

    #[error("registry error: {0}")]
    Registry(RegistryError),

    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

/// Result type for predictor operations
pub type Result<T> = std::result::Result<T, PredictorError>;

/// Binary outcome label reported back to the serving caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    No,
    Yes,
}

impl From<bool> for Response {
    fn from(value: bool) -> Self {
        if value {
            Response::Yes
        } else {
            Response::No
        }
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Response::Yes => write!(f, "Response-Yes"),
            Response::No => write!(f, "Response-No"),
        }
    }
}

/// Serves predictions over the latest promoted bundle
#[derive(Debug)]
pub struct ResponsePredictor {
    bundle: ModelBundle,
}

impl ResponsePredictor {
    /// Load the latest bundle under `key` from the registry
    pub fn from_registry<R: ModelRegistry + ?Sized>(registry: &R, key: &str) -> Result<Self> {
        let bytes = match registry.get_latest(key) {
            Ok(bytes) => bytes,
            Err(RegistryError::NotFound(_)) => {
                return Err(PredictorError::NoDeployedModel(key.to_string()));
            }
            Err(e) => return Err(PredictorError::Registry(e)),
        };
        Ok(Self {
            bundle: ModelBundle::from_bytes(&bytes)?,
        })
    }

    /// Wrap an already-loaded bundle
    pub fn from_bundle(bundle: ModelBundle) -> Self {
        Self { bundle }
    }

    /// Predict the response for one record
    pub fn predict(&self, record: &InsuranceRecord) -> Response {
        Response::from(self.bundle.predict(record))
    }

    /// Metadata of the bundle being served
    pub fn metadata(&self) -> &BundleMetadata {
        &self.bundle.metadata
    }
}
