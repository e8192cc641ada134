//! Credential selection criteria.

use super::{KeyInfo, UsageType};

/// Criteria used to select credentials from a resolver.
///
/// Every field is optional; an empty set matches every credential.
#[derive(Debug, Clone, Default)]
pub struct CriteriaSet {
    /// Entity that must own the credential.
    pub entity_id: Option<String>,
    /// Required usage.
    pub usage: UsageType,
    /// Acceptable key names. Empty accepts any name.
    pub key_names: Vec<String>,
    /// Untrusted key material to resolve credentials from.
    pub key_info: Option<KeyInfo>,
}

impl CriteriaSet {
    /// Creates an empty criteria set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates criteria selecting credentials owned by `entity_id`.
    #[must_use]
    pub fn for_entity(entity_id: impl Into<String>) -> Self {
        Self {
            entity_id: Some(entity_id.into()),
            ..Self::default()
        }
    }

    /// Sets the required usage.
    #[must_use]
    pub fn with_usage(mut self, usage: UsageType) -> Self {
        self.usage = usage;
        self
    }

    /// Adds an acceptable key name.
    #[must_use]
    pub fn with_key_name(mut self, name: impl Into<String>) -> Self {
        self.key_names.push(name.into());
        self
    }

    /// Sets the key info to resolve from.
    #[must_use]
    pub fn with_key_info(mut self, key_info: KeyInfo) -> Self {
        self.key_info = Some(key_info);
        self
    }
}
