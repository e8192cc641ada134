//! Storage service trait.

use crate::error::StorageResult;
use crate::record::{StorageCapabilities, VersionedRecord};

/// Versioned, expiring key/value storage partitioned by context.
///
/// Implementations must be thread-safe. All operations on the same
/// (context, key) are linearizable within one service instance. Expiration
/// times are absolute epoch milliseconds; a record whose expiration is at or
/// before "now" is invisible to reads and updates but can still be deleted
/// or reaped.
///
/// Only infrastructure failures are reported as
/// [`StorageError::Failure`](crate::StorageError::Failure). Versioned writes
/// that lose a race report
/// [`StorageError::VersionMismatch`](crate::StorageError::VersionMismatch).
pub trait StorageService: Send + Sync {
    /// Returns the size limits of this backend.
    fn capabilities(&self) -> StorageCapabilities;

    /// Creates a record.
    ///
    /// Succeeds if the slot is empty or holds an expired record, which is
    /// replaced. Returns `false` if a live record already exists.
    fn create(
        &self,
        context: &str,
        key: &str,
        value: &str,
        expiration: Option<i64>,
    ) -> StorageResult<bool>;

    /// Reads a live record.
    fn read(&self, context: &str, key: &str) -> StorageResult<Option<VersionedRecord>>;

    /// Reads a record only if it differs from the caller's `version`.
    ///
    /// Returns `(Some(version), None)` when nothing changed,
    /// `(Some(stored), Some(record))` when it did, and `(None, None)` when
    /// the record is absent or expired.
    fn read_if_newer(
        &self,
        context: &str,
        key: &str,
        version: u32,
    ) -> StorageResult<(Option<u32>, Option<VersionedRecord>)>;

    /// Replaces the value of a live record, bumping its version.
    ///
    /// An `expiration` of `None` keeps the current expiration. Returns
    /// `false` if no live record exists.
    fn update(
        &self,
        context: &str,
        key: &str,
        value: &str,
        expiration: Option<i64>,
    ) -> StorageResult<bool>;

    /// Replaces the value of a live record if it is still at
    /// `expected_version`.
    ///
    /// Returns the new version, or `None` if no live record exists.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::VersionMismatch`](crate::StorageError::VersionMismatch)
    /// if the stored version differs; the record is left unmodified.
    fn update_with_version(
        &self,
        expected_version: u32,
        context: &str,
        key: &str,
        value: &str,
        expiration: Option<i64>,
    ) -> StorageResult<Option<u32>>;

    /// Changes only the expiration of a live record.
    ///
    /// The version is unchanged. Returns the current version, or `None` if no
    /// live record exists.
    fn update_expiration(
        &self,
        context: &str,
        key: &str,
        expiration: i64,
    ) -> StorageResult<Option<u32>>;

    /// Deletes a record, live or expired.
    fn delete(&self, context: &str, key: &str) -> StorageResult<bool>;

    /// Deletes a record if it is still at `expected_version`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::VersionMismatch`](crate::StorageError::VersionMismatch)
    /// if the stored version differs.
    fn delete_with_version(
        &self,
        expected_version: u32,
        context: &str,
        key: &str,
    ) -> StorageResult<bool>;

    /// Removes every expired record in `context`, returning how many.
    fn reap(&self, context: &str) -> StorageResult<usize>;

    /// Sets the expiration of every live record in `context`.
    fn update_context_expiration(&self, context: &str, expiration: i64) -> StorageResult<()>;

    /// Removes a context and all of its records.
    fn delete_context(&self, context: &str) -> StorageResult<()>;
}
