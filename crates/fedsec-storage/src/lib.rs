//! # fedsec-storage
//!
//! Versioned, expiring key/value storage for stateful security decisions.
//!
//! Records live in named *contexts*; keys are unique only within their
//! context. Every value-changing write bumps the record's version by one, and
//! versioned writes fail with [`StorageError::VersionMismatch`] when another
//! writer got there first. Absence is never an error: it is reported as
//! `None` or `false`.
//!
//! ## Services
//!
//! - [`StorageService`] - The storage contract
//! - [`MemoryStorageService`] - In-process implementation behind one
//!   reader/writer lock
//! - [`ReplayCache`] - One-time-use check for message identifiers
//!
//! ## Example
//!
//! ```
//! use fedsec_storage::{MemoryStorageService, StorageService};
//!
//! let storage = MemoryStorageService::new();
//! assert!(storage.create("sessions", "abc123", "payload-v1", None).unwrap());
//!
//! let record = storage.read("sessions", "abc123").unwrap().unwrap();
//! assert_eq!(record.version, 1);
//! ```
//!
//! ## NIST 800-53 Rev5 Controls
//!
//! - IA-2(8): Replay-resistant authentication
//! - SC-23: Session authenticity

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod error;
pub mod memory;
pub mod record;
pub mod replay;
pub mod service;

pub use error::{StorageError, StorageResult};
pub use memory::{CleanupTask, MemoryStorageService};
pub use record::{StorageCapabilities, VersionedRecord};
pub use replay::ReplayCache;
pub use service::StorageService;
