//! Model version metadata

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable metadata record for one stored bundle version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelVersion {
    /// Registry key the version lives under
    pub key: String,
    /// Monotonically increasing version number, starting at 1
    pub version: u32,
    /// Stored object size in bytes
    pub size: u64,
    /// SHA-256 digest of the stored bytes
    pub digest: String,
    /// When the version was written
    pub created_at: DateTime<Utc>,
    /// Whether this version currently holds the latest marker
    ///
    /// Exactly one version per key carries `true`; the flag flips to the new
    /// version atomically on every put.
    pub is_latest: bool,
}
