//! Security error types.

use fedsec_crypto::CryptoError;
use thiserror::Error;

/// Result type for XML security operations.
pub type SecurityResult<T> = Result<T, SecurityError>;

/// XML security errors.
///
/// A trust evaluation that completes and finds no trusted signer is not an
/// error; it returns `Ok(false)`.
#[derive(Debug, Error)]
pub enum SecurityError {
    /// Trust could not be evaluated, e.g. a credential resolver failed.
    #[error("security evaluation failed: {0}")]
    EvaluationFailure(String),

    /// The input asks for something this implementation does not do.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// A required input was missing or empty.
    #[error("precondition violated: {0}")]
    PreconditionViolation(String),

    /// No key could decrypt the data.
    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    /// Encryption could not be completed.
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    /// Signing could not be completed.
    #[error("signing failed: {0}")]
    SigningFailed(String),

    /// Credential material is malformed or unusable.
    #[error("invalid credential: {0}")]
    InvalidCredential(String),

    /// A security policy rejected the message.
    #[error("policy violation: {0}")]
    PolicyViolation(String),

    /// Underlying cryptographic failure.
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

impl SecurityError {
    /// Creates an [`SecurityError::EvaluationFailure`].
    pub fn evaluation(message: impl Into<String>) -> Self {
        Self::EvaluationFailure(message.into())
    }

    /// Creates an [`SecurityError::UnsupportedOperation`].
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedOperation(message.into())
    }

    /// Creates a [`SecurityError::PreconditionViolation`].
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::PreconditionViolation(message.into())
    }
}
