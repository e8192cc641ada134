//! Error handling for fedsec.
//!
//! ## NIST 800-53 Rev5: SI-11 (Error Handling)
//!
//! Only setup-time failures live here. Runtime storage and security
//! evaluation failures have their own error types in the crates that raise
//! them.

use thiserror::Error;

/// Result type alias using the core error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading configuration or installing telemetry.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be parsed or failed validation.
    #[error("configuration error: {0}")]
    Config(String),

    /// Configuration file could not be read or written.
    #[error("configuration I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A global tracing subscriber could not be installed.
    #[error("telemetry error: {0}")]
    Telemetry(String),
}

impl Error {
    /// Returns whether this error came from the operator's input rather than
    /// the environment.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
