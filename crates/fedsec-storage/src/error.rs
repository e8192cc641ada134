//! Storage error types.

use std::fmt;

/// Storage operation errors.
///
/// Missing contexts and keys are not errors; they surface as `None` or
/// `false` from the operation itself.
#[derive(Debug)]
pub enum StorageError {
    /// A versioned write found a different version than the caller expected.
    ///
    /// The stored record is untouched. Re-read and retry.
    VersionMismatch {
        /// Version the caller based its write on.
        expected: u32,
        /// Version currently stored.
        actual: u32,
    },
    /// A context, key or value exceeded the backend's capabilities.
    SizeLimitExceeded {
        /// Which field was too large.
        kind: &'static str,
        /// Actual length in bytes.
        actual: usize,
        /// Maximum length in bytes.
        limit: usize,
    },
    /// The underlying storage medium failed.
    Failure(String),
}

impl StorageError {
    /// Creates a [`StorageError::Failure`].
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(message.into())
    }

    /// Returns true for optimistic concurrency conflicts.
    #[must_use]
    pub const fn is_version_mismatch(&self) -> bool {
        matches!(self, Self::VersionMismatch { .. })
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VersionMismatch { expected, actual } => {
                write!(f, "version mismatch: expected {expected}, found {actual}")
            }
            Self::SizeLimitExceeded {
                kind,
                actual,
                limit,
            } => write!(f, "{kind} of {actual} bytes exceeds limit of {limit}"),
            Self::Failure(msg) => write!(f, "storage failure: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
