//! Cryptographic error types.

use thiserror::Error;

/// Result type for cryptographic primitives.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Error type for cryptographic primitives.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The algorithm identifier is not recognized.
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// The algorithm is recognized but not implemented by this provider.
    #[error("algorithm not supported: {0}")]
    UnsupportedAlgorithm(String),

    /// Key bytes could not be parsed.
    #[error("invalid key format: {0}")]
    InvalidKey(String),

    /// The key is well formed but of the wrong type or size for the algorithm.
    #[error("key does not fit algorithm: {0}")]
    KeyMismatch(String),

    /// Key generation failed.
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    /// Signing failed.
    #[error("signing failed: {0}")]
    Signing(String),

    /// Encryption or key wrapping failed.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Decryption or key unwrapping failed.
    #[error("decryption failed")]
    Decryption,
}
