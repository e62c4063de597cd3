//! Model registry trait and digest utility

use sha2::{Digest, Sha256};

use super::error::Result;
use super::version::ModelVersion;

/// Versioned, append-only store of model bundles with a latest pointer
///
/// Implementations never overwrite: every `put` appends a new immutable
/// version and atomically moves the latest marker onto it. The store is the
/// only state shared across pipeline runs.
pub trait ModelRegistry: Send + Sync {
    /// Append a new version under `key` and mark it latest
    fn put(&mut self, key: &str, bundle: &[u8]) -> Result<ModelVersion>;

    /// Bytes of the version currently marked latest
    ///
    /// Returns [`RegistryError::NotFound`](super::RegistryError::NotFound)
    /// when no version exists under the key; that is the expected cold-start
    /// outcome, not a failure.
    fn get_latest(&self, key: &str) -> Result<Vec<u8>>;

    /// Metadata of the version currently marked latest
    fn latest_version(&self, key: &str) -> Result<ModelVersion>;

    /// All versions under `key`, newest first
    ///
    /// Audit/rollback surface; not on the training hot path.
    fn list_versions(&self, key: &str) -> Result<Vec<ModelVersion>>;
}

/// SHA-256 digest of stored bytes, hex encoded
pub fn compute_digest(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_digest() {
        let digest = compute_digest(b"hello world");
        assert_eq!(digest.len(), 64);
        assert_eq!(
            digest,
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_digest_deterministic(data in prop::collection::vec(any::<u8>(), 0..1000)) {
            prop_assert_eq!(compute_digest(&data), compute_digest(&data));
        }

        #[test]
        fn prop_digest_length_constant(data in prop::collection::vec(any::<u8>(), 0..1000)) {
            prop_assert_eq!(compute_digest(&data).len(), 64);
        }
    }
}
