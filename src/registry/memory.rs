//! In-memory registry for tests and embedding callers

use std::collections::HashMap;

use chrono::Utc;

use super::error::{RegistryError, Result};
use super::traits::{compute_digest, ModelRegistry};
use super::version::ModelVersion;

/// In-memory registry with the same append-only semantics as
/// [`LocalRegistry`](super::LocalRegistry)
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    objects: HashMap<String, Vec<(ModelVersion, Vec<u8>)>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ModelRegistry for InMemoryRegistry {
    fn put(&mut self, key: &str, bundle: &[u8]) -> Result<ModelVersion> {
        let versions = self.objects.entry(key.to_string()).or_default();
        let next = versions.last().map_or(0, |(v, _)| v.version) + 1;

        for (old, _) in versions.iter_mut() {
            old.is_latest = false;
        }
        let record = ModelVersion {
            key: key.to_string(),
            version: next,
            size: bundle.len() as u64,
            digest: compute_digest(bundle),
            created_at: Utc::now(),
            is_latest: true,
        };
        versions.push((record.clone(), bundle.to_vec()));
        Ok(record)
    }

    fn get_latest(&self, key: &str) -> Result<Vec<u8>> {
        self.objects
            .get(key)
            .and_then(|versions| versions.last())
            .map(|(_, bytes)| bytes.clone())
            .ok_or_else(|| RegistryError::NotFound(key.to_string()))
    }

    fn latest_version(&self, key: &str) -> Result<ModelVersion> {
        self.objects
            .get(key)
            .and_then(|versions| versions.last())
            .map(|(record, _)| record.clone())
            .ok_or_else(|| RegistryError::NotFound(key.to_string()))
    }

    fn list_versions(&self, key: &str) -> Result<Vec<ModelVersion>> {
        let versions = self
            .objects
            .get(key)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| RegistryError::NotFound(key.to_string()))?;
        Ok(versions.iter().rev().map(|(record, _)| record.clone()).collect())
    }
}
