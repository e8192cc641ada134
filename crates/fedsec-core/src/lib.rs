//! # fedsec-core
//!
//! Core utilities, configuration, and error handling for fedsec.
//!
//! This crate provides the foundational pieces shared by the storage,
//! crypto and XML security crates:
//!
//! - [`config`] - TOML-backed configuration with secure defaults
//! - [`clock`] - Injectable wall clock for expiration decisions
//! - [`event`] - Structured security audit events
//! - [`telemetry`] - `tracing` subscriber installation
//!
//! ## NIST 800-53 Rev5 Controls
//!
//! - AU-2: Event logging framework
//! - AU-8: Time stamps
//! - SI-11: Error handling

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod telemetry;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{Error, Result};
