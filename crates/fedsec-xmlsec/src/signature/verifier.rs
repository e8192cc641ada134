//! Raw signature verification against a single credential.

use fedsec_core::config::SignatureConfig;
use fedsec_crypto::{CryptoError, SignatureAlgorithm};

use super::Signature;
use crate::credential::Credential;
use crate::error::{SecurityError, SecurityResult};

/// Verifies a signature with one candidate credential.
///
/// This is a cryptographic check only; it says nothing about whether the
/// credential should be trusted.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureVerifier {
    allow_sha1: bool,
}

impl SignatureVerifier {
    /// Creates a verifier that rejects SHA-1.
    #[must_use]
    pub const fn new() -> Self {
        Self { allow_sha1: false }
    }

    /// Creates a verifier from configuration.
    #[must_use]
    pub const fn from_config(config: &SignatureConfig) -> Self {
        Self {
            allow_sha1: config.allow_sha1,
        }
    }

    /// Allows RSA-SHA1 signatures (not recommended).
    #[must_use]
    pub const fn allow_sha1(mut self, allow: bool) -> Self {
        self.allow_sha1 = allow;
        self
    }

    /// Verifies `signature` with `credential`.
    ///
    /// # Errors
    ///
    /// See [`verify_raw`](Self::verify_raw).
    pub fn verify(&self, signature: &Signature, credential: &Credential) -> SecurityResult<bool> {
        self.verify_raw(
            signature.signature_algorithm(),
            credential,
            signature.signed_info(),
            signature.signature_value(),
        )
    }

    /// Verifies a detached signature over `content`.
    ///
    /// Returns `Ok(false)` when the signature does not verify or the
    /// credential's key cannot be used with the algorithm.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityError::UnsupportedOperation`] for unknown or
    /// disallowed algorithms.
    pub fn verify_raw(
        &self,
        algorithm_uri: &str,
        credential: &Credential,
        content: &[u8],
        signature_value: &[u8],
    ) -> SecurityResult<bool> {
        let algorithm = SignatureAlgorithm::from_uri(algorithm_uri).ok_or_else(|| {
            SecurityError::unsupported(format!("unknown signature algorithm: {algorithm_uri}"))
        })?;
        if algorithm.is_deprecated() && !self.allow_sha1 {
            return Err(SecurityError::unsupported(
                "SHA-1 signatures are not allowed",
            ));
        }

        match fedsec_crypto::signature::verify(
            algorithm,
            credential.verification_key(),
            content,
            signature_value,
        ) {
            Ok(valid) => Ok(valid),
            Err(CryptoError::KeyMismatch(reason) | CryptoError::InvalidKey(reason)) => {
                tracing::debug!(%reason, "credential cannot verify this signature");
                Ok(false)
            }
            Err(CryptoError::UnsupportedAlgorithm(reason)) => {
                tracing::debug!(%reason, "credential key type not supported");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }
}
