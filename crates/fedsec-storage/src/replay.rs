//! One-time-use checks for message identifiers.

use std::sync::Arc;

use fedsec_core::config::ReplayConfig;
use fedsec_core::event::{EventType, SecurityEvent};
use parking_lot::Mutex;

use crate::error::{StorageError, StorageResult};
use crate::service::StorageService;

/// Placeholder stored for each seen token; only the key matters.
const SEEN_MARKER: &str = "x";

/// Replay cache over a [`StorageService`].
///
/// [`check`](Self::check) serializes behind one cache-wide lock so that the
/// absence check and the insert are indivisible at the cache level, whatever
/// the backend does internally.
///
/// Backend failures are resolved by the `strict` flag: strict caches report
/// a replay (fail closed), lenient caches report a fresh token (fail open).
/// A context too large for the backend is rejected in either mode.
pub struct ReplayCache {
    storage: Arc<dyn StorageService>,
    strict: bool,
    lock: Mutex<()>,
}

impl ReplayCache {
    /// Creates a replay cache.
    pub fn new(storage: Arc<dyn StorageService>, strict: bool) -> Self {
        Self {
            storage,
            strict,
            lock: Mutex::new(()),
        }
    }

    /// Creates a replay cache using the configured failure policy.
    pub fn from_config(storage: Arc<dyn StorageService>, config: &ReplayConfig) -> Self {
        Self::new(storage, config.strict)
    }

    /// Returns true if backend failures are treated as replays.
    #[must_use]
    pub const fn is_strict(&self) -> bool {
        self.strict
    }

    /// Records `token` in `context` and returns true if it had not been seen.
    ///
    /// A token longer than the backend's key capability is replaced by its
    /// SHA-256 hex digest before use. The record expires at
    /// `expires_at_millis`, after which the same token is accepted again.
    pub fn check(&self, context: &str, token: &str, expires_at_millis: i64) -> bool {
        let key = self.storage_key(token);

        let _guard = self.lock.lock();
        match self.check_and_insert(context, &key, expires_at_millis) {
            Ok(true) => true,
            Ok(false) => {
                tracing::warn!(context, token = %key, "replay detected");
                SecurityEvent::builder(EventType::ReplayCheck)
                    .failure("replay detected")
                    .detail("context", context)
                    .emit();
                false
            }
            Err(e @ StorageError::SizeLimitExceeded { .. }) => {
                tracing::warn!(context, error = %e, "replay check rejected oversized input");
                SecurityEvent::builder(EventType::ReplayCheck)
                    .failure(e.to_string())
                    .emit();
                false
            }
            Err(e) => {
                tracing::error!(
                    context,
                    strict = self.strict,
                    error = %e,
                    "replay cache storage failure"
                );
                SecurityEvent::builder(EventType::ReplayCheck)
                    .failure(e.to_string())
                    .detail("context", context)
                    .detail("strict", self.strict.to_string())
                    .emit();
                !self.strict
            }
        }
    }

    fn check_and_insert(&self, context: &str, key: &str, expires_at: i64) -> StorageResult<bool> {
        if self.storage.read(context, key)?.is_some() {
            return Ok(false);
        }
        self.storage
            .create(context, key, SEEN_MARKER, Some(expires_at))
    }

    fn storage_key(&self, token: &str) -> String {
        if token.len() > self.storage.capabilities().key_size {
            fedsec_crypto::sha256_hex(token.as_bytes())
        } else {
            token.to_string()
        }
    }
}

impl std::fmt::Debug for ReplayCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplayCache")
            .field("strict", &self.strict)
            .finish_non_exhaustive()
    }
}
