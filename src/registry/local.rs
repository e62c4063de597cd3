//! Filesystem-backed registry
//!
//! Layout under the registry root, one directory per key:
//!
//! ```text
//! <root>/<key>/v1/bundle.bin      stored bytes
//! <root>/<key>/v1/version.json    version metadata
//! <root>/<key>/LATEST             number of the latest version
//! ```
//!
//! Versions are append-only: `put` claims `max + 1` with `create_dir`, which
//! fails if a concurrent writer got there first (surfaced as `Conflict`, never
//! silently retried). The latest marker is flipped by writing a temp file and
//! renaming it over `LATEST`, so readers observe either the old or the new
//! latest, never a partial write.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;

use super::error::{RegistryError, Result};
use super::traits::{compute_digest, ModelRegistry};
use super::version::ModelVersion;

const BUNDLE_FILE: &str = "bundle.bin";
const VERSION_FILE: &str = "version.json";
const LATEST_FILE: &str = "LATEST";

/// Local filesystem registry
#[derive(Debug, Clone)]
pub struct LocalRegistry {
    root: PathBuf,
}

impl LocalRegistry {
    /// Open a registry rooted at the given directory, creating it if absent
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn key_dir(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    fn version_dir(&self, key: &str, version: u32) -> PathBuf {
        self.key_dir(key).join(format!("v{version}"))
    }

    /// Version numbers present under a key, unordered
    fn stored_versions(&self, key: &str) -> Result<Vec<u32>> {
        let dir = self.key_dir(key);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut versions = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let name = entry.file_name();
            if let Some(number) = name.to_str().and_then(|n| n.strip_prefix('v')) {
                if let Ok(v) = number.parse::<u32>() {
                    versions.push(v);
                }
            }
        }
        Ok(versions)
    }

    fn read_latest_marker(&self, key: &str) -> Result<u32> {
        let path = self.key_dir(key).join(LATEST_FILE);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RegistryError::NotFound(key.to_string()));
            }
            Err(e) => return Err(RegistryError::Io(e)),
        };
        raw.trim()
            .parse()
            .map_err(|_| RegistryError::Corrupt(format!("bad latest marker for {key}: {raw:?}")))
    }

    /// Atomically point the latest marker at `version`
    fn write_latest_marker(&self, key: &str, version: u32) -> Result<()> {
        let dir = self.key_dir(key);
        let tmp = dir.join(format!("{LATEST_FILE}.tmp"));
        let target = dir.join(LATEST_FILE);

        let mut file = std::fs::File::create(&tmp)?;
        file.write_all(version.to_string().as_bytes())?;
        file.sync_all()?;
        std::fs::rename(&tmp, &target)?;
        Ok(())
    }

    /// Claim a version number by creating its directory
    ///
    /// `create_dir` (not `create_dir_all`) is the claim: a racing writer that
    /// got there first makes this fail with `AlreadyExists`, surfaced as
    /// `Conflict` and never silently retried.
    fn claim_version(&self, key: &str, version: u32) -> Result<std::path::PathBuf> {
        let dir = self.version_dir(key, version);
        if let Some(parent) = dir.parent() {
            std::fs::create_dir_all(parent)?;
        }
        match std::fs::create_dir(&dir) {
            Ok(()) => Ok(dir),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                Err(RegistryError::Conflict {
                    key: key.to_string(),
                    version,
                })
            }
            Err(e) => Err(RegistryError::Io(e)),
        }
    }

    fn read_version(&self, key: &str, version: u32, latest: u32) -> Result<ModelVersion> {
        let path = self.version_dir(key, version).join(VERSION_FILE);
        let raw = std::fs::read_to_string(&path)?;
        let mut record: ModelVersion = serde_json::from_str(&raw)
            .map_err(|e| RegistryError::Corrupt(format!("{}: {e}", path.display())))?;
        record.is_latest = version == latest;
        Ok(record)
    }

    fn write_durable(path: &Path, bytes: &[u8]) -> Result<()> {
        let mut file = std::fs::File::create(path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        Ok(())
    }
}

impl ModelRegistry for LocalRegistry {
    fn put(&mut self, key: &str, bundle: &[u8]) -> Result<ModelVersion> {
        let next = self.stored_versions(key)?.into_iter().max().unwrap_or(0) + 1;
        let dir = self.claim_version(key, next)?;

        let record = ModelVersion {
            key: key.to_string(),
            version: next,
            size: bundle.len() as u64,
            digest: compute_digest(bundle),
            created_at: Utc::now(),
            is_latest: true,
        };

        Self::write_durable(&dir.join(BUNDLE_FILE), bundle)?;
        let metadata = serde_json::to_vec_pretty(&record)
            .map_err(|e| RegistryError::Corrupt(e.to_string()))?;
        Self::write_durable(&dir.join(VERSION_FILE), &metadata)?;
        self.write_latest_marker(key, next)?;

        Ok(record)
    }

    fn get_latest(&self, key: &str) -> Result<Vec<u8>> {
        let latest = self.read_latest_marker(key)?;
        let path = self.version_dir(key, latest).join(BUNDLE_FILE);
        let bytes = std::fs::read(&path)?;

        let expected = self.read_version(key, latest, latest)?.digest;
        let actual = compute_digest(&bytes);
        if expected != actual {
            return Err(RegistryError::Corrupt(format!(
                "digest mismatch for {key} v{latest}: expected {expected}, got {actual}"
            )));
        }
        Ok(bytes)
    }

    fn latest_version(&self, key: &str) -> Result<ModelVersion> {
        let latest = self.read_latest_marker(key)?;
        self.read_version(key, latest, latest)
    }

    fn list_versions(&self, key: &str) -> Result<Vec<ModelVersion>> {
        let mut numbers = self.stored_versions(key)?;
        if numbers.is_empty() {
            return Err(RegistryError::NotFound(key.to_string()));
        }
        numbers.sort_unstable_by(|a, b| b.cmp(a));

        let latest = self.read_latest_marker(key)?;
        let mut versions = Vec::with_capacity(numbers.len());
        for number in numbers {
            match self.read_version(key, number, latest) {
                Ok(version) => versions.push(version),
                // an abandoned claim has a directory but no metadata yet
                Err(RegistryError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
        }
        Ok(versions)
    }
}
