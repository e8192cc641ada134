//! `ds:KeyInfo` model.

use crate::encryption::EncryptedKey;

/// Key material carried inside a signature or encrypted structure.
///
/// Everything here is untrusted: it came off the wire.
#[derive(Debug, Clone, Default)]
pub struct KeyInfo {
    /// `ds:KeyName` values.
    pub key_names: Vec<String>,
    /// `ds:X509Certificate` values as DER.
    pub x509_certificates: Vec<Vec<u8>>,
    /// `ds:KeyValue` / `dsig11:DEREncodedKeyValue` as DER `SubjectPublicKeyInfo`.
    pub public_keys: Vec<Vec<u8>>,
    /// Inline `xenc:EncryptedKey` children.
    pub encrypted_keys: Vec<EncryptedKey>,
    /// `ds:RetrievalMethod/@URI` values referencing `EncryptedKey`s.
    pub retrieval_methods: Vec<String>,
}

impl KeyInfo {
    /// Creates an empty key info.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no key material or reference is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.key_names.is_empty()
            && self.x509_certificates.is_empty()
            && self.public_keys.is_empty()
            && self.encrypted_keys.is_empty()
            && self.retrieval_methods.is_empty()
    }

    /// Adds a key name.
    #[must_use]
    pub fn with_key_name(mut self, name: impl Into<String>) -> Self {
        self.key_names.push(name.into());
        self
    }

    /// Adds a DER certificate.
    #[must_use]
    pub fn with_certificate(mut self, der: impl Into<Vec<u8>>) -> Self {
        self.x509_certificates.push(der.into());
        self
    }

    /// Adds a DER public key.
    #[must_use]
    pub fn with_public_key(mut self, spki: impl Into<Vec<u8>>) -> Self {
        self.public_keys.push(spki.into());
        self
    }

    /// Adds an inline encrypted key.
    #[must_use]
    pub fn with_encrypted_key(mut self, key: EncryptedKey) -> Self {
        self.encrypted_keys.push(key);
        self
    }

    /// Adds a retrieval method reference such as `#_abc`.
    #[must_use]
    pub fn with_retrieval_method(mut self, uri: impl Into<String>) -> Self {
        self.retrieval_methods.push(uri.into());
        self
    }
}
