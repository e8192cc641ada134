//! In-memory storage service.
//!
//! This module provides [`MemoryStorageService`], an in-process
//! implementation of [`StorageService`].
//!
//! # Features
//!
//! - **Thread-safe**: one [`parking_lot::RwLock`] guards the whole map of
//!   contexts. Writers hold it for lookup plus mutation, which keeps
//!   version checks and writes indivisible.
//! - **Expiration**: expired records are invisible immediately and removed
//!   by [`reap`](StorageService::reap), [`reap_all`](MemoryStorageService::reap_all)
//!   or an optional background [`CleanupTask`].
//! - **Deterministic time**: the current time comes from an injected
//!   [`Clock`].
//!
//! # Limitations
//!
//! - Data is not persisted; all data is lost when the process exits
//! - The single lock is a throughput ceiling. A sharded map would keep the
//!   same per-key guarantees if that ever matters.

use std::collections::HashMap;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Weak};
use std::thread::JoinHandle;
use std::time::Duration;

use fedsec_core::clock::{Clock, SystemClock};
use fedsec_core::config::StorageConfig;
use parking_lot::RwLock;

use crate::error::{StorageError, StorageResult};
use crate::record::{StorageCapabilities, VersionedRecord};
use crate::service::StorageService;

type ContextMap = HashMap<String, HashMap<String, VersionedRecord>>;

/// In-memory storage service.
///
/// # Example
///
/// ```
/// use fedsec_storage::{MemoryStorageService, StorageService};
///
/// let storage = MemoryStorageService::new();
/// storage.create("sessions", "abc123", "payload-v1", None).unwrap();
///
/// let v2 = storage
///     .update_with_version(1, "sessions", "abc123", "payload-v2", None)
///     .unwrap();
/// assert_eq!(v2, Some(2));
/// ```
pub struct MemoryStorageService {
    contexts: RwLock<ContextMap>,
    capabilities: StorageCapabilities,
    clock: Arc<dyn Clock>,
}

impl MemoryStorageService {
    /// Creates a service with default capabilities and the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(&StorageConfig::default())
    }

    /// Creates a service with capabilities taken from configuration.
    #[must_use]
    pub fn from_config(config: &StorageConfig) -> Self {
        Self {
            contexts: RwLock::new(HashMap::new()),
            capabilities: StorageCapabilities::from(config),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the clock used for expiration decisions.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Removes expired records from every context, returning how many.
    ///
    /// Contexts left empty are dropped as well.
    pub fn reap_all(&self) -> usize {
        let now = self.clock.now_millis();
        let mut contexts = self.contexts.write();
        let mut reaped = 0;
        contexts.retain(|_, records| {
            let before = records.len();
            records.retain(|_, record| !record.is_expired_at(now));
            reaped += before - records.len();
            !records.is_empty()
        });
        reaped
    }

    /// Returns the number of stored records in a context, expired ones
    /// included.
    #[must_use]
    pub fn stored_len(&self, context: &str) -> usize {
        self.contexts.read().get(context).map_or(0, HashMap::len)
    }

    /// Starts a background thread that calls [`reap_all`](Self::reap_all)
    /// every `interval`.
    ///
    /// The thread holds only a weak reference and exits once the service is
    /// dropped, or when the returned task is shut down or dropped.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Failure`] if `interval` is zero or the thread
    /// cannot be spawned.
    pub fn start_cleanup(self: &Arc<Self>, interval: Duration) -> StorageResult<CleanupTask> {
        if interval.is_zero() {
            return Err(StorageError::failure("cleanup interval must be non-zero"));
        }
        let service = Arc::downgrade(self);
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = std::thread::Builder::new()
            .name("fedsec-storage-cleanup".to_string())
            .spawn(move || run_cleanup(&service, &shutdown_rx, interval))
            .map_err(|e| StorageError::failure(format!("failed to spawn cleanup thread: {e}")))?;

        tracing::debug!(interval_secs = interval.as_secs(), "storage cleanup task started");

        Ok(CleanupTask {
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Starts the background cleanup at the configured
    /// `cleanup_interval_secs`.
    ///
    /// # Errors
    ///
    /// As for [`start_cleanup`](Self::start_cleanup).
    pub fn start_cleanup_from_config(
        self: &Arc<Self>,
        config: &StorageConfig,
    ) -> StorageResult<CleanupTask> {
        self.start_cleanup(Duration::from_secs(config.cleanup_interval_secs))
    }

    fn now(&self) -> i64 {
        self.clock.now_millis()
    }

    fn check_sizes(&self, context: &str, key: &str, value: Option<&str>) -> StorageResult<()> {
        let caps = &self.capabilities;
        if context.len() > caps.context_size {
            return Err(size_exceeded("context", context.len(), caps.context_size));
        }
        if key.len() > caps.key_size {
            return Err(size_exceeded("key", key.len(), caps.key_size));
        }
        if let Some(value) = value {
            if value.len() > caps.value_size {
                return Err(size_exceeded("value", value.len(), caps.value_size));
            }
        }
        Ok(())
    }
}

impl Default for MemoryStorageService {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryStorageService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStorageService")
            .field("contexts", &self.contexts.read().len())
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}

fn size_exceeded(kind: &'static str, actual: usize, limit: usize) -> StorageError {
    StorageError::SizeLimitExceeded {
        kind,
        actual,
        limit,
    }
}

fn next_version(version: u32) -> StorageResult<u32> {
    version
        .checked_add(1)
        .ok_or_else(|| StorageError::failure("record version overflow"))
}

fn live_mut<'a>(
    contexts: &'a mut ContextMap,
    context: &str,
    key: &str,
    now: i64,
) -> Option<&'a mut VersionedRecord> {
    contexts
        .get_mut(context)
        .and_then(|records| records.get_mut(key))
        .filter(|record| !record.is_expired_at(now))
}

impl StorageService for MemoryStorageService {
    fn capabilities(&self) -> StorageCapabilities {
        self.capabilities
    }

    fn create(
        &self,
        context: &str,
        key: &str,
        value: &str,
        expiration: Option<i64>,
    ) -> StorageResult<bool> {
        self.check_sizes(context, key, Some(value))?;
        let now = self.now();

        let mut contexts = self.contexts.write();
        let records = contexts.entry(context.to_string()).or_default();
        if records.get(key).is_some_and(|existing| !existing.is_expired_at(now)) {
            return Ok(false);
        }
        records.insert(key.to_string(), VersionedRecord::new(value, expiration));
        Ok(true)
    }

    fn read(&self, context: &str, key: &str) -> StorageResult<Option<VersionedRecord>> {
        let now = self.now();
        let contexts = self.contexts.read();
        Ok(contexts
            .get(context)
            .and_then(|records| records.get(key))
            .filter(|record| !record.is_expired_at(now))
            .cloned())
    }

    fn read_if_newer(
        &self,
        context: &str,
        key: &str,
        version: u32,
    ) -> StorageResult<(Option<u32>, Option<VersionedRecord>)> {
        let now = self.now();
        let contexts = self.contexts.read();
        let live = contexts
            .get(context)
            .and_then(|records| records.get(key))
            .filter(|record| !record.is_expired_at(now));

        Ok(match live {
            None => (None, None),
            Some(record) if record.version == version => (Some(version), None),
            Some(record) => (Some(record.version), Some(record.clone())),
        })
    }

    fn update(
        &self,
        context: &str,
        key: &str,
        value: &str,
        expiration: Option<i64>,
    ) -> StorageResult<bool> {
        self.check_sizes(context, key, Some(value))?;
        let now = self.now();

        let mut contexts = self.contexts.write();
        let Some(record) = live_mut(&mut contexts, context, key, now) else {
            return Ok(false);
        };
        record.version = next_version(record.version)?;
        record.value = value.to_string();
        if expiration.is_some() {
            record.expiration = expiration;
        }
        Ok(true)
    }

    fn update_with_version(
        &self,
        expected_version: u32,
        context: &str,
        key: &str,
        value: &str,
        expiration: Option<i64>,
    ) -> StorageResult<Option<u32>> {
        self.check_sizes(context, key, Some(value))?;
        let now = self.now();

        let mut contexts = self.contexts.write();
        let Some(record) = live_mut(&mut contexts, context, key, now) else {
            return Ok(None);
        };
        if record.version != expected_version {
            tracing::debug!(
                context,
                expected = expected_version,
                actual = record.version,
                "versioned update rejected"
            );
            return Err(StorageError::VersionMismatch {
                expected: expected_version,
                actual: record.version,
            });
        }
        record.version = next_version(record.version)?;
        record.value = value.to_string();
        if expiration.is_some() {
            record.expiration = expiration;
        }
        Ok(Some(record.version))
    }

    fn update_expiration(
        &self,
        context: &str,
        key: &str,
        expiration: i64,
    ) -> StorageResult<Option<u32>> {
        let now = self.now();
        let mut contexts = self.contexts.write();
        Ok(live_mut(&mut contexts, context, key, now).map(|record| {
            record.expiration = Some(expiration);
            record.version
        }))
    }

    fn delete(&self, context: &str, key: &str) -> StorageResult<bool> {
        let mut contexts = self.contexts.write();
        let Some(records) = contexts.get_mut(context) else {
            return Ok(false);
        };
        let removed = records.remove(key).is_some();
        if records.is_empty() {
            contexts.remove(context);
        }
        Ok(removed)
    }

    fn delete_with_version(
        &self,
        expected_version: u32,
        context: &str,
        key: &str,
    ) -> StorageResult<bool> {
        let mut contexts = self.contexts.write();
        let Some(records) = contexts.get_mut(context) else {
            return Ok(false);
        };
        let Some(record) = records.get(key) else {
            return Ok(false);
        };
        if record.version != expected_version {
            return Err(StorageError::VersionMismatch {
                expected: expected_version,
                actual: record.version,
            });
        }
        records.remove(key);
        if records.is_empty() {
            contexts.remove(context);
        }
        Ok(true)
    }

    fn reap(&self, context: &str) -> StorageResult<usize> {
        let now = self.now();
        let mut contexts = self.contexts.write();
        let Some(records) = contexts.get_mut(context) else {
            return Ok(0);
        };
        let before = records.len();
        records.retain(|_, record| !record.is_expired_at(now));
        let reaped = before - records.len();
        if records.is_empty() {
            contexts.remove(context);
        }
        if reaped > 0 {
            tracing::debug!(context, reaped, "reaped expired records");
        }
        Ok(reaped)
    }

    fn update_context_expiration(&self, context: &str, expiration: i64) -> StorageResult<()> {
        let now = self.now();
        let mut contexts = self.contexts.write();
        if let Some(records) = contexts.get_mut(context) {
            records
                .values_mut()
                .filter(|record| !record.is_expired_at(now))
                .for_each(|record| record.expiration = Some(expiration));
        }
        Ok(())
    }

    fn delete_context(&self, context: &str) -> StorageResult<()> {
        self.contexts.write().remove(context);
        Ok(())
    }
}

/// Handle to the background cleanup thread.
///
/// Dropping the handle stops the thread and waits for it to exit.
#[derive(Debug)]
pub struct CleanupTask {
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl CleanupTask {
    /// Stops the cleanup thread and waits for it to exit.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        // Closing the channel wakes the thread immediately.
        self.shutdown_tx.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("storage cleanup thread panicked");
            }
        }
    }
}

impl Drop for CleanupTask {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_cleanup(
    service: &Weak<MemoryStorageService>,
    shutdown_rx: &mpsc::Receiver<()>,
    interval: Duration,
) {
    loop {
        match shutdown_rx.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {
                let Some(service) = service.upgrade() else {
                    break;
                };
                let reaped = service.reap_all();
                if reaped > 0 {
                    tracing::debug!(reaped, "cleanup sweep removed expired records");
                }
            }
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    tracing::debug!("storage cleanup task stopped");
}

#[cfg(test)]
mod tests {
    use std::thread;

    use fedsec_core::clock::ManualClock;
    use proptest::prelude::*;

    use super::*;

    const T: i64 = 1_700_000_000_000;

    fn storage_at(now: i64) -> (MemoryStorageService, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(now));
        let storage = MemoryStorageService::new().with_clock(clock.clone());
        (storage, clock)
    }

    #[test]
    fn create_read_round_trip() {
        let (storage, _) = storage_at(T);
        assert!(storage.create("ctx", "k", "v", Some(T + 1_000)).unwrap());

        let record = storage.read("ctx", "k").unwrap().unwrap();
        assert_eq!(record, VersionedRecord::new("v", Some(T + 1_000)));
        assert!(storage.read("ctx", "other").unwrap().is_none());
        assert!(storage.read("other", "k").unwrap().is_none());
    }

    #[test]
    fn create_does_not_overwrite_live_record() {
        let (storage, _) = storage_at(T);
        assert!(storage.create("ctx", "k", "first", None).unwrap());
        assert!(!storage.create("ctx", "k", "second", None).unwrap());
        assert_eq!(storage.read("ctx", "k").unwrap().unwrap().value, "first");
    }

    #[test]
    fn create_replaces_expired_record() {
        let (storage, clock) = storage_at(T);
        storage.create("ctx", "k", "first", Some(T + 10)).unwrap();
        storage.update("ctx", "k", "first-b", None).unwrap();

        clock.set(T + 10);
        assert!(storage.create("ctx", "k", "second", None).unwrap());

        let record = storage.read("ctx", "k").unwrap().unwrap();
        assert_eq!(record.value, "second");
        assert_eq!(record.version, 1);
        assert_eq!(record.expiration, None);
    }

    #[test]
    fn expired_record_is_unreadable_but_deletable() {
        let (storage, _) = storage_at(T);
        storage.create("ctx", "k", "v", Some(T - 1)).unwrap();

        assert!(storage.read("ctx", "k").unwrap().is_none());
        assert_eq!(storage.read_if_newer("ctx", "k", 1).unwrap(), (None, None));
        assert!(!storage.update("ctx", "k", "v2", None).unwrap());
        assert_eq!(storage.stored_len("ctx"), 1);

        assert!(storage.delete("ctx", "k").unwrap());
        assert_eq!(storage.stored_len("ctx"), 0);
    }

    #[test]
    fn reap_removes_only_expired_records() {
        let (storage, _) = storage_at(T);
        storage.create("ctx", "dead", "v", Some(T - 1)).unwrap();
        storage.create("ctx", "alive", "v", Some(T + 1)).unwrap();
        storage.create("ctx", "forever", "v", None).unwrap();

        assert_eq!(storage.reap("ctx").unwrap(), 1);
        assert_eq!(storage.stored_len("ctx"), 2);
        assert!(storage.read("ctx", "alive").unwrap().is_some());
        assert_eq!(storage.reap("missing").unwrap(), 0);
    }

    #[test]
    fn update_bumps_version_and_keeps_expiration() {
        let (storage, _) = storage_at(T);
        storage.create("ctx", "k", "v1", Some(T + 500)).unwrap();

        assert!(storage.update("ctx", "k", "v2", None).unwrap());
        let record = storage.read("ctx", "k").unwrap().unwrap();
        assert_eq!(record.version, 2);
        assert_eq!(record.value, "v2");
        assert_eq!(record.expiration, Some(T + 500));

        assert!(!storage.update("ctx", "missing", "v", None).unwrap());
    }

    #[test]
    fn stale_version_is_rejected_without_side_effects() {
        let (storage, _) = storage_at(T);
        storage.create("ctx", "k", "v1", None).unwrap();
        storage.update("ctx", "k", "v2", None).unwrap();
        storage.update("ctx", "k", "v3", None).unwrap();

        for stale in [1, 2] {
            let err = storage
                .update_with_version(stale, "ctx", "k", "lost", Some(T + 9))
                .unwrap_err();
            assert!(matches!(
                err,
                StorageError::VersionMismatch {
                    expected,
                    actual: 3
                } if expected == stale
            ));
        }

        let record = storage.read("ctx", "k").unwrap().unwrap();
        assert_eq!(record.value, "v3");
        assert_eq!(record.version, 3);
        assert_eq!(record.expiration, None);
    }

    #[test]
    fn update_with_version_on_missing_record() {
        let (storage, _) = storage_at(T);
        assert_eq!(
            storage.update_with_version(1, "ctx", "k", "v", None).unwrap(),
            None
        );
    }

    #[test]
    fn update_expiration_keeps_version() {
        let (storage, clock) = storage_at(T);
        storage.create("ctx", "k", "v", Some(T + 10)).unwrap();

        assert_eq!(storage.update_expiration("ctx", "k", T + 1_000).unwrap(), Some(1));
        clock.set(T + 500);
        let record = storage.read("ctx", "k").unwrap().unwrap();
        assert_eq!(record.version, 1);
        assert_eq!(record.expiration, Some(T + 1_000));

        assert_eq!(storage.update_expiration("ctx", "missing", T).unwrap(), None);
    }

    #[test]
    fn delete_with_version_checks_version() {
        let (storage, _) = storage_at(T);
        storage.create("ctx", "k", "v1", None).unwrap();
        storage.update("ctx", "k", "v2", None).unwrap();

        let err = storage.delete_with_version(1, "ctx", "k").unwrap_err();
        assert!(err.is_version_mismatch());
        assert!(storage.read("ctx", "k").unwrap().is_some());

        assert!(storage.delete_with_version(2, "ctx", "k").unwrap());
        assert!(!storage.delete_with_version(2, "ctx", "k").unwrap());
    }

    #[test]
    fn context_expiration_touches_only_live_records() {
        let (storage, clock) = storage_at(T);
        storage.create("sessions", "a", "v", Some(T + 100)).unwrap();
        storage.create("sessions", "b", "v", None).unwrap();
        storage.create("sessions", "dead", "v", Some(T - 1)).unwrap();
        storage.create("other", "c", "v", Some(T + 100)).unwrap();

        storage.update_context_expiration("sessions", T + 5_000).unwrap();
        clock.set(T + 1_000);

        assert!(storage.read("sessions", "a").unwrap().is_some());
        assert_eq!(
            storage.read("sessions", "b").unwrap().unwrap().expiration,
            Some(T + 5_000)
        );
        assert!(storage.read("sessions", "dead").unwrap().is_none());
        assert!(storage.read("other", "c").unwrap().is_none());
    }

    #[test]
    fn delete_context_removes_everything() {
        let (storage, _) = storage_at(T);
        storage.create("sessions", "a", "v", None).unwrap();
        storage.create("sessions", "b", "v", None).unwrap();
        storage.create("keep", "a", "v", None).unwrap();

        storage.delete_context("sessions").unwrap();
        assert!(storage.read("sessions", "a").unwrap().is_none());
        assert!(storage.read("keep", "a").unwrap().is_some());
        storage.delete_context("never-existed").unwrap();
    }

    #[test]
    fn oversize_key_is_rejected() {
        let (storage, _) = storage_at(T);
        let key = "k".repeat(256);
        let err = storage.create("ctx", &key, "v", None).unwrap_err();
        assert!(matches!(
            err,
            StorageError::SizeLimitExceeded {
                kind: "key",
                actual: 256,
                limit: 255
            }
        ));
        assert!(storage.create("ctx", &"k".repeat(255), "v", None).unwrap());
    }

    #[test]
    fn reap_all_drops_empty_contexts() {
        let (storage, _) = storage_at(T);
        storage.create("a", "k", "v", Some(T - 1)).unwrap();
        storage.create("b", "k", "v", Some(T - 1)).unwrap();
        storage.create("b", "live", "v", None).unwrap();

        assert_eq!(storage.reap_all(), 2);
        assert_eq!(storage.stored_len("a"), 0);
        assert_eq!(storage.stored_len("b"), 1);
    }

    #[test]
    fn concurrent_versioned_updates_never_lose_writes() {
        let storage = MemoryStorageService::new();
        storage.create("ctx", "counter", "0", None).unwrap();

        let writers = 8;
        let per_writer = 25;
        thread::scope(|scope| {
            for _ in 0..writers {
                scope.spawn(|| {
                    for _ in 0..per_writer {
                        loop {
                            let current = storage.read("ctx", "counter").unwrap().unwrap();
                            let next = current.value.parse::<u32>().unwrap() + 1;
                            match storage.update_with_version(
                                current.version,
                                "ctx",
                                "counter",
                                &next.to_string(),
                                None,
                            ) {
                                Ok(Some(_)) => break,
                                Err(e) if e.is_version_mismatch() => continue,
                                other => panic!("unexpected result: {other:?}"),
                            }
                        }
                    }
                });
            }
        });

        let record = storage.read("ctx", "counter").unwrap().unwrap();
        let total = writers * per_writer;
        assert_eq!(record.value, total.to_string());
        assert_eq!(record.version, total + 1);
    }

    #[test]
    fn cleanup_task_reaps_in_background() {
        let clock = Arc::new(ManualClock::new(T));
        let storage = Arc::new(MemoryStorageService::new().with_clock(clock.clone()));
        storage.create("ctx", "k", "v", Some(T + 1)).unwrap();

        let task = storage.start_cleanup(Duration::from_millis(10)).unwrap();
        clock.set(T + 2);

        let mut reaped = false;
        for _ in 0..200 {
            if storage.stored_len("ctx") == 0 {
                reaped = true;
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
        task.shutdown();
        assert!(reaped, "cleanup task did not reap the expired record");
    }

    #[test]
    fn cleanup_task_stops_when_service_dropped() {
        let storage = Arc::new(MemoryStorageService::new());
        let task = storage.start_cleanup(Duration::from_millis(5)).unwrap();
        drop(storage);
        thread::sleep(Duration::from_millis(20));
        // Joins without hanging.
        drop(task);
    }

    #[test]
    fn zero_cleanup_interval_is_rejected() {
        let storage = Arc::new(MemoryStorageService::new());
        assert!(matches!(
            storage.start_cleanup(Duration::ZERO),
            Err(StorageError::Failure(_))
        ));

        let config = StorageConfig::default().cleanup_interval_secs(0);
        assert!(matches!(
            storage.start_cleanup_from_config(&config),
            Err(StorageError::Failure(_))
        ));
    }

    #[test]
    fn cleanup_task_starts_from_config() {
        let config = StorageConfig::default().cleanup_interval_secs(1);
        let clock = Arc::new(ManualClock::new(T));
        let storage =
            Arc::new(MemoryStorageService::from_config(&config).with_clock(clock.clone()));
        storage.create("ctx", "k", "v", Some(T + 1)).unwrap();

        let task = storage.start_cleanup_from_config(&config).unwrap();
        clock.set(T + 2);

        let mut reaped = false;
        for _ in 0..60 {
            if storage.stored_len("ctx") == 0 {
                reaped = true;
                break;
            }
            thread::sleep(Duration::from_millis(50));
        }
        task.shutdown();
        assert!(reaped, "configured cleanup did not reap the expired record");
    }

    proptest! {
        #[test]
        fn versions_increase_by_exactly_one(values in proptest::collection::vec("[a-z]{0,8}", 1..32)) {
            let storage = MemoryStorageService::new();
            storage.create("ctx", "k", "initial", None).unwrap();

            let mut expected = 1u32;
            for (i, value) in values.iter().enumerate() {
                if i % 2 == 0 {
                    prop_assert!(storage.update("ctx", "k", value, None).unwrap());
                    expected += 1;
                } else {
                    let new_version = storage
                        .update_with_version(expected, "ctx", "k", value, None)
                        .unwrap();
                    expected += 1;
                    prop_assert_eq!(new_version, Some(expected));
                }
                let record = storage.read("ctx", "k").unwrap().unwrap();
                prop_assert_eq!(record.version, expected);
                prop_assert_eq!(&record.value, value);
            }
        }
    }
}
