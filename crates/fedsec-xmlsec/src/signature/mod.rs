//! XML Signature objects, verification and signing.
//!
//! A [`Signature`] is the typed form of a `ds:Signature` element. The
//! `SignedInfo` it covers is held as canonical octets, so verification here
//! is a pure cryptographic check with no XML processing.
//!
//! # Signing Algorithms
//!
//! - RSA-SHA256 / SHA384 / SHA512
//! - ECDSA-SHA256 / SHA384 / SHA512 (P-256, P-384, P-521)
//! - HMAC-SHA256 / SHA384 / SHA512
//!
//! RSA-SHA1 is accepted for verification only, and only when enabled.

mod signer;
mod verifier;

pub use signer::Signer;
pub use verifier::SignatureVerifier;

use std::sync::Arc;

use base64::Engine;
use parking_lot::RwLock;

use crate::constants::CanonicalizationAlgorithm;
use crate::credential::{Credential, KeyInfo};

/// A parsed XML signature.
///
/// Immutable apart from the validating credential, which a trust engine
/// records after a successful evaluation. That value is informational; it
/// carries no authority of its own.
#[derive(Debug)]
pub struct Signature {
    signature_algorithm: String,
    canonicalization_algorithm: String,
    key_info: Option<KeyInfo>,
    reference_uri: Option<String>,
    signed_info: Vec<u8>,
    signature_value: Vec<u8>,
    validating_credential: RwLock<Option<Arc<Credential>>>,
}

impl Signature {
    /// Creates a signature.
    ///
    /// # Arguments
    ///
    /// * `signature_algorithm` - `SignatureMethod/@Algorithm`
    /// * `canonicalization_algorithm` - `CanonicalizationMethod/@Algorithm`
    /// * `signed_info` - Canonical `SignedInfo` octets
    /// * `signature_value` - Decoded `SignatureValue`
    pub fn new(
        signature_algorithm: impl Into<String>,
        canonicalization_algorithm: impl Into<String>,
        signed_info: Vec<u8>,
        signature_value: Vec<u8>,
    ) -> Self {
        Self {
            signature_algorithm: signature_algorithm.into(),
            canonicalization_algorithm: canonicalization_algorithm.into(),
            key_info: None,
            reference_uri: None,
            signed_info,
            signature_value,
            validating_credential: RwLock::new(None),
        }
    }

    /// Attaches the embedded `KeyInfo`.
    #[must_use]
    pub fn with_key_info(mut self, key_info: KeyInfo) -> Self {
        self.key_info = Some(key_info);
        self
    }

    /// Sets the `Reference/@URI` of the signed content.
    #[must_use]
    pub fn with_reference_uri(mut self, uri: impl Into<String>) -> Self {
        self.reference_uri = Some(uri.into());
        self
    }

    /// Returns the signature algorithm URI.
    #[must_use]
    pub fn signature_algorithm(&self) -> &str {
        &self.signature_algorithm
    }

    /// Returns the canonicalization algorithm URI.
    #[must_use]
    pub fn canonicalization_algorithm(&self) -> &str {
        &self.canonicalization_algorithm
    }

    /// Returns the canonicalization algorithm, if recognized.
    #[must_use]
    pub fn canonicalization(&self) -> Option<CanonicalizationAlgorithm> {
        CanonicalizationAlgorithm::from_uri(&self.canonicalization_algorithm)
    }

    /// Returns the embedded `KeyInfo`.
    #[must_use]
    pub const fn key_info(&self) -> Option<&KeyInfo> {
        self.key_info.as_ref()
    }

    /// Returns the reference URI.
    #[must_use]
    pub fn reference_uri(&self) -> Option<&str> {
        self.reference_uri.as_deref()
    }

    /// Returns the canonical `SignedInfo` octets.
    #[must_use]
    pub fn signed_info(&self) -> &[u8] {
        &self.signed_info
    }

    /// Returns the signature value.
    #[must_use]
    pub fn signature_value(&self) -> &[u8] {
        &self.signature_value
    }

    /// Returns the signature value as it appears in XML.
    #[must_use]
    pub fn signature_value_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.signature_value)
    }

    /// Returns the credential that last validated this signature.
    #[must_use]
    pub fn validating_credential(&self) -> Option<Arc<Credential>> {
        self.validating_credential.read().clone()
    }

    pub(crate) fn set_validating_credential(&self, credential: Arc<Credential>) {
        *self.validating_credential.write() = Some(credential);
    }
}

impl Clone for Signature {
    fn clone(&self) -> Self {
        Self {
            signature_algorithm: self.signature_algorithm.clone(),
            canonicalization_algorithm: self.canonicalization_algorithm.clone(),
            key_info: self.key_info.clone(),
            reference_uri: self.reference_uri.clone(),
            signed_info: self.signed_info.clone(),
            signature_value: self.signature_value.clone(),
            validating_credential: RwLock::new(self.validating_credential()),
        }
    }
}
