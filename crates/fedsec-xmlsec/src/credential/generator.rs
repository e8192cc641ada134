//! `KeyInfo` generation for outbound signatures and encrypted keys.

use super::{Credential, KeyInfo};
use crate::error::SecurityResult;

/// Produces the `KeyInfo` published alongside a signature or encrypted key.
pub trait KeyInfoGenerator: Send + Sync {
    /// Returns the `KeyInfo` for `credential`, or `None` if there is nothing
    /// to publish.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential cannot be described.
    fn generate(&self, credential: &Credential) -> SecurityResult<Option<KeyInfo>>;
}

/// Generator that copies selected parts of the credential into `KeyInfo`.
///
/// By default only the entity certificate is emitted.
#[derive(Debug, Clone, Copy)]
pub struct BasicKeyInfoGenerator {
    emit_key_names: bool,
    emit_public_key: bool,
    emit_entity_certificate: bool,
    emit_certificate_chain: bool,
}

impl Default for BasicKeyInfoGenerator {
    fn default() -> Self {
        Self {
            emit_key_names: false,
            emit_public_key: false,
            emit_entity_certificate: true,
            emit_certificate_chain: false,
        }
    }
}

impl BasicKeyInfoGenerator {
    /// Creates a generator emitting the entity certificate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits the credential's key names.
    #[must_use]
    pub const fn emit_key_names(mut self, emit: bool) -> Self {
        self.emit_key_names = emit;
        self
    }

    /// Emits the bare public key.
    #[must_use]
    pub const fn emit_public_key(mut self, emit: bool) -> Self {
        self.emit_public_key = emit;
        self
    }

    /// Emits the entity certificate.
    #[must_use]
    pub const fn emit_entity_certificate(mut self, emit: bool) -> Self {
        self.emit_entity_certificate = emit;
        self
    }

    /// Emits the whole certificate chain. Implies the entity certificate.
    #[must_use]
    pub const fn emit_certificate_chain(mut self, emit: bool) -> Self {
        self.emit_certificate_chain = emit;
        self
    }
}

impl KeyInfoGenerator for BasicKeyInfoGenerator {
    fn generate(&self, credential: &Credential) -> SecurityResult<Option<KeyInfo>> {
        let mut key_info = KeyInfo::new();

        if self.emit_key_names {
            key_info.key_names.extend(credential.key_names().iter().cloned());
        }
        if self.emit_public_key {
            if let Some(spki) = credential.public_key() {
                key_info.public_keys.push(spki.to_vec());
            }
        }
        if self.emit_certificate_chain {
            key_info
                .x509_certificates
                .extend(credential.certificates().iter().cloned());
        } else if self.emit_entity_certificate {
            if let Some(cert) = credential.entity_certificate() {
                key_info.x509_certificates.push(cert.to_vec());
            }
        }

        Ok((!key_info.is_empty()).then_some(key_info))
    }
}
