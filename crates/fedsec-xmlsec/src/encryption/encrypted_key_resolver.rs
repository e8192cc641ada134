//! Locating the `EncryptedKey`s that may unlock an `EncryptedData`.

use std::sync::Arc;

use super::{EncryptedData, EncryptedKey};

/// Finds candidate encrypted keys for some encrypted data.
pub trait EncryptedKeyResolver: Send + Sync {
    /// Returns keys for `data` addressed to one of `recipients`.
    ///
    /// A key without a `Recipient`, or an empty recipient list, always
    /// matches.
    fn resolve(&self, data: &EncryptedData, recipients: &[String]) -> Vec<EncryptedKey>;
}

pub(crate) fn matches_recipient(key: &EncryptedKey, recipients: &[String]) -> bool {
    match key.recipient.as_deref() {
        None => true,
        Some(recipient) => recipients.is_empty() || recipients.iter().any(|r| r == recipient),
    }
}

/// Keys carried inline in the data's `KeyInfo`.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineEncryptedKeyResolver;

impl EncryptedKeyResolver for InlineEncryptedKeyResolver {
    fn resolve(&self, data: &EncryptedData, recipients: &[String]) -> Vec<EncryptedKey> {
        data.key_info
            .iter()
            .flat_map(|key_info| &key_info.encrypted_keys)
            .filter(|key| matches_recipient(key, recipients))
            .cloned()
            .collect()
    }
}

/// Keys referenced from the data's `KeyInfo` by same-document
/// `RetrievalMethod` URIs (`#id`).
///
/// References are resolved against a key set supplied up front, typically
/// the keys found beside the data.
#[derive(Debug, Clone, Default)]
pub struct RetrievalMethodEncryptedKeyResolver {
    keys: Vec<EncryptedKey>,
}

impl RetrievalMethodEncryptedKeyResolver {
    /// Creates a resolver over the referenceable keys.
    #[must_use]
    pub fn new(keys: Vec<EncryptedKey>) -> Self {
        Self { keys }
    }
}

impl EncryptedKeyResolver for RetrievalMethodEncryptedKeyResolver {
    fn resolve(&self, data: &EncryptedData, recipients: &[String]) -> Vec<EncryptedKey> {
        let Some(key_info) = &data.key_info else {
            return Vec::new();
        };
        key_info
            .retrieval_methods
            .iter()
            .filter_map(|uri| match uri.strip_prefix('#') {
                Some(id) => self.keys.iter().find(|key| key.id == id),
                None => {
                    tracing::debug!(uri, "ignoring non-local retrieval method");
                    None
                }
            })
            .filter(|key| matches_recipient(key, recipients))
            .cloned()
            .collect()
    }
}

/// Concatenates the keys of several resolvers, in order.
#[derive(Clone, Default)]
pub struct ChainingEncryptedKeyResolver {
    resolvers: Vec<Arc<dyn EncryptedKeyResolver>>,
}

impl ChainingEncryptedKeyResolver {
    /// Creates a chain.
    #[must_use]
    pub fn new(resolvers: Vec<Arc<dyn EncryptedKeyResolver>>) -> Self {
        Self { resolvers }
    }

    /// Appends a resolver.
    #[must_use]
    pub fn with(mut self, resolver: Arc<dyn EncryptedKeyResolver>) -> Self {
        self.resolvers.push(resolver);
        self
    }
}

impl std::fmt::Debug for ChainingEncryptedKeyResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainingEncryptedKeyResolver")
            .field("resolvers", &self.resolvers.len())
            .finish()
    }
}

impl EncryptedKeyResolver for ChainingEncryptedKeyResolver {
    fn resolve(&self, data: &EncryptedData, recipients: &[String]) -> Vec<EncryptedKey> {
        self.resolvers
            .iter()
            .flat_map(|resolver| resolver.resolve(data, recipients))
            .collect()
    }
}
