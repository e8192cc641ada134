//! Stored record and backend capability types.

use fedsec_core::config::StorageConfig;
use serde::{Deserialize, Serialize};

/// A single stored value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionedRecord {
    /// Starts at 1 and grows by exactly 1 on each value change.
    pub version: u32,
    /// Opaque payload.
    pub value: String,
    /// Absolute expiration in epoch milliseconds; `None` never expires.
    pub expiration: Option<i64>,
}

impl VersionedRecord {
    /// Creates a first-version record.
    #[must_use]
    pub fn new(value: impl Into<String>, expiration: Option<i64>) -> Self {
        Self {
            version: 1,
            value: value.into(),
            expiration,
        }
    }

    /// Returns true if the record has expired at `now_millis`.
    #[must_use]
    pub fn is_expired_at(&self, now_millis: i64) -> bool {
        self.expiration.is_some_and(|exp| exp <= now_millis)
    }
}

/// Size limits a backend supports, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageCapabilities {
    /// Maximum context length.
    pub context_size: usize,
    /// Maximum key length.
    pub key_size: usize,
    /// Maximum value length.
    pub value_size: usize,
}

impl Default for StorageCapabilities {
    fn default() -> Self {
        Self::from(&StorageConfig::default())
    }
}

impl From<&StorageConfig> for StorageCapabilities {
    fn from(config: &StorageConfig) -> Self {
        Self {
            context_size: config.context_size,
            key_size: config.key_size,
            value_size: config.value_size,
        }
    }
}
