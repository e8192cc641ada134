//! Signature creation.

use std::sync::Arc;

use fedsec_core::config::SignatureConfig;
use fedsec_crypto::SignatureAlgorithm;

use super::Signature;
use crate::constants::CanonicalizationAlgorithm;
use crate::credential::{Credential, KeyInfoGenerator};
use crate::error::{SecurityError, SecurityResult};

/// Signs canonical `SignedInfo` octets with a credential.
///
/// # Example
///
/// ```rust,ignore
/// let signer = Signer::new(credential)
///     .with_algorithm(SignatureAlgorithm::EcdsaSha256)
///     .with_key_info_generator(Arc::new(BasicKeyInfoGenerator::new()));
/// let signature = signer.sign(Some("#_response"), &canonical_signed_info)?;
/// ```
pub struct Signer {
    credential: Arc<Credential>,
    algorithm: SignatureAlgorithm,
    canonicalization: CanonicalizationAlgorithm,
    key_info_generator: Option<Arc<dyn KeyInfoGenerator>>,
}

impl Signer {
    /// Creates a signer using RSA-SHA256 and exclusive C14N.
    #[must_use]
    pub fn new(credential: Arc<Credential>) -> Self {
        Self {
            credential,
            algorithm: SignatureAlgorithm::RsaSha256,
            canonicalization: CanonicalizationAlgorithm::ExclusiveC14N,
            key_info_generator: None,
        }
    }

    /// Creates a signer with algorithms taken from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityError::UnsupportedOperation`] if a configured URI is
    /// not recognized.
    pub fn from_config(
        credential: Arc<Credential>,
        config: &SignatureConfig,
    ) -> SecurityResult<Self> {
        let algorithm = SignatureAlgorithm::from_uri(&config.algorithm).ok_or_else(|| {
            SecurityError::unsupported(format!("unknown signature algorithm: {}", config.algorithm))
        })?;
        let canonicalization = CanonicalizationAlgorithm::from_uri(&config.canonicalization)
            .ok_or_else(|| {
                SecurityError::unsupported(format!(
                    "unknown canonicalization algorithm: {}",
                    config.canonicalization
                ))
            })?;

        Ok(Self::new(credential)
            .with_algorithm(algorithm)
            .with_canonicalization(canonicalization))
    }

    /// Sets the signature algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: SignatureAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Sets the canonicalization algorithm recorded in the signature.
    #[must_use]
    pub fn with_canonicalization(mut self, canonicalization: CanonicalizationAlgorithm) -> Self {
        self.canonicalization = canonicalization;
        self
    }

    /// Sets the generator for the published `KeyInfo`.
    #[must_use]
    pub fn with_key_info_generator(mut self, generator: Arc<dyn KeyInfoGenerator>) -> Self {
        self.key_info_generator = Some(generator);
        self
    }

    /// Signs `signed_info`, which must already be canonical.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityError::SigningFailed`] if the credential cannot sign
    /// with the configured algorithm.
    pub fn sign(
        &self,
        reference_uri: Option<&str>,
        signed_info: &[u8],
    ) -> SecurityResult<Signature> {
        let signature_value = self.sign_raw(signed_info)?;

        let mut signature = Signature::new(
            self.algorithm.uri(),
            self.canonicalization.uri(),
            signed_info.to_vec(),
            signature_value,
        );
        if let Some(uri) = reference_uri {
            signature = signature.with_reference_uri(uri);
        }
        if let Some(generator) = &self.key_info_generator {
            if let Some(key_info) = generator.generate(&self.credential)? {
                signature = signature.with_key_info(key_info);
            }
        }

        tracing::debug!(
            algorithm = self.algorithm.uri(),
            reference = reference_uri.unwrap_or(""),
            "signed content"
        );
        Ok(signature)
    }

    /// Produces a detached signature value, as used by the HTTP-Redirect
    /// binding.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityError::SigningFailed`] if the credential cannot sign
    /// with the configured algorithm.
    pub fn sign_raw(&self, content: &[u8]) -> SecurityResult<Vec<u8>> {
        let key = self.credential.signing_key().ok_or_else(|| {
            SecurityError::SigningFailed("credential has no private or secret key".into())
        })?;
        fedsec_crypto::signature::sign(self.algorithm, key, content)
            .map_err(|e| SecurityError::SigningFailed(e.to_string()))
    }
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer")
            .field("algorithm", &self.algorithm)
            .field("canonicalization", &self.canonicalization)
            .finish_non_exhaustive()
    }
}
