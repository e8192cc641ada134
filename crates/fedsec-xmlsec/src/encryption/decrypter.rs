//! Recovering plaintext from `EncryptedData`.

use std::sync::Arc;

use fedsec_core::event::{EventType, SecurityEvent};
use fedsec_crypto::algorithm::{BlockEncryptionAlgorithm, KeyEncryptionAlgorithm};
use fedsec_crypto::cipher;
use zeroize::Zeroizing;

use super::encrypted_key_resolver::{matches_recipient, EncryptedKeyResolver};
use super::{EncryptedData, EncryptedElement, EncryptedKey, EncryptionType};
use crate::credential::{CredentialResolver, CriteriaSet, KeyInfo, UsageType};
use crate::error::{SecurityError, SecurityResult};

/// Decrypts `EncryptedData`.
///
/// The data encryption key is looked for in order:
///
/// 1. The data-key resolver, given the data's `KeyInfo`
/// 2. Inline `EncryptedKey`s for an accepted recipient, unwrapped with the
///    key-encryption-key resolver
/// 3. Keys from the external [`EncryptedKeyResolver`], unwrapped the same way
///
/// A candidate that fails is logged and skipped. Only `Element` type data
/// is supported.
#[derive(Clone, Default)]
pub struct Decrypter {
    data_key_resolver: Option<Arc<dyn CredentialResolver>>,
    kek_resolver: Option<Arc<dyn CredentialResolver>>,
    encrypted_key_resolver: Option<Arc<dyn EncryptedKeyResolver>>,
    recipients: Vec<String>,
}

impl Decrypter {
    /// Creates a decrypter with no key sources.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves data encryption keys directly.
    #[must_use]
    pub fn with_data_key_resolver(mut self, resolver: Arc<dyn CredentialResolver>) -> Self {
        self.data_key_resolver = Some(resolver);
        self
    }

    /// Resolves key encryption keys for unwrapping `EncryptedKey`s.
    #[must_use]
    pub fn with_kek_resolver(mut self, resolver: Arc<dyn CredentialResolver>) -> Self {
        self.kek_resolver = Some(resolver);
        self
    }

    /// Locates encrypted keys outside the data's `KeyInfo`.
    #[must_use]
    pub fn with_encrypted_key_resolver(mut self, resolver: Arc<dyn EncryptedKeyResolver>) -> Self {
        self.encrypted_key_resolver = Some(resolver);
        self
    }

    /// Accepts keys addressed to `recipient`.
    #[must_use]
    pub fn with_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipients.push(recipient.into());
        self
    }

    /// Decrypts `data`.
    ///
    /// # Errors
    ///
    /// - [`SecurityError::UnsupportedOperation`] for `Content` type data or
    ///   an unknown algorithm
    /// - [`SecurityError::DecryptionFailed`] if no key decrypts the data
    pub fn decrypt_data(&self, data: &EncryptedData) -> SecurityResult<Vec<u8>> {
        self.decrypt_with_siblings(data, &[])
    }

    /// Decrypts an encrypted element, also trying its sibling keys.
    ///
    /// # Errors
    ///
    /// As for [`decrypt_data`](Self::decrypt_data).
    pub fn decrypt_element(&self, element: &EncryptedElement) -> SecurityResult<Vec<u8>> {
        self.decrypt_with_siblings(&element.encrypted_data, &element.encrypted_keys)
    }

    /// Unwraps one encrypted key for use with `data_algorithm`.
    ///
    /// Every key encryption key the resolver yields is tried in turn.
    ///
    /// # Errors
    ///
    /// - [`SecurityError::UnsupportedOperation`] for an unknown algorithm
    /// - [`SecurityError::DecryptionFailed`] if there is no key encryption key
    ///   resolver or none unwraps the key
    pub fn decrypt_key(
        &self,
        encrypted_key: &EncryptedKey,
        data_algorithm: &str,
    ) -> SecurityResult<Zeroizing<Vec<u8>>> {
        let data_algorithm = block_algorithm(data_algorithm)?;
        let key_algorithm =
            KeyEncryptionAlgorithm::from_uri(&encrypted_key.encryption_method).ok_or_else(|| {
                SecurityError::unsupported(format!(
                    "unsupported key encryption algorithm: {}",
                    encrypted_key.encryption_method
                ))
            })?;
        let Some(kek_resolver) = &self.kek_resolver else {
            return Err(SecurityError::DecryptionFailed(
                "no key encryption key resolver configured".to_string(),
            ));
        };

        let criteria = key_criteria(encrypted_key.key_info.as_ref());
        for kek in kek_resolver.resolve(&criteria)? {
            let material = if key_algorithm.is_key_wrap() {
                kek.secret_key()
            } else {
                kek.private_key()
            };
            let Some(material) = material else {
                continue;
            };
            match cipher::decrypt_key(key_algorithm, material, &encrypted_key.cipher_value) {
                Ok(key) if key.len() == data_algorithm.key_len() => return Ok(key),
                Ok(key) => tracing::debug!(
                    id = %encrypted_key.id,
                    len = key.len(),
                    "unwrapped key has wrong length for data algorithm"
                ),
                Err(e) => tracing::debug!(
                    id = %encrypted_key.id,
                    error = %e,
                    "key encryption key did not unwrap key"
                ),
            }
        }

        Err(SecurityError::DecryptionFailed(format!(
            "no key encryption key unwrapped {}",
            encrypted_key.id
        )))
    }

    fn decrypt_with_siblings(
        &self,
        data: &EncryptedData,
        siblings: &[EncryptedKey],
    ) -> SecurityResult<Vec<u8>> {
        let result = self.try_decrypt(data, siblings);
        match &result {
            Ok(_) => {
                tracing::debug!(id = %data.id, "decrypted data");
                SecurityEvent::builder(EventType::Decryption)
                    .detail("algorithm", data.encryption_method.as_str())
                    .emit();
            }
            Err(e) => {
                tracing::warn!(id = %data.id, error = %e, "decryption failed");
                SecurityEvent::builder(EventType::Decryption)
                    .failure(e.to_string())
                    .detail("algorithm", data.encryption_method.as_str())
                    .emit();
            }
        }
        result
    }

    fn try_decrypt(
        &self,
        data: &EncryptedData,
        siblings: &[EncryptedKey],
    ) -> SecurityResult<Vec<u8>> {
        if data.encrypted_type == EncryptionType::Content {
            return Err(SecurityError::unsupported(
                "decryption of Content type EncryptedData is not supported",
            ));
        }
        let algorithm = block_algorithm(&data.encryption_method)?;

        if let Some(plaintext) = self.try_data_key_resolver(data, algorithm) {
            return Ok(plaintext);
        }

        if self.kek_resolver.is_some() {
            let inline = data
                .key_info
                .iter()
                .flat_map(|key_info| &key_info.encrypted_keys)
                .filter(|key| matches_recipient(key, &self.recipients));
            if let Some(plaintext) = self.try_encrypted_keys(data, algorithm, inline) {
                return Ok(plaintext);
            }

            if let Some(resolver) = &self.encrypted_key_resolver {
                let external = resolver.resolve(data, &self.recipients);
                if let Some(plaintext) = self.try_encrypted_keys(data, algorithm, external.iter()) {
                    return Ok(plaintext);
                }
            }

            let siblings = siblings
                .iter()
                .filter(|key| matches_recipient(key, &self.recipients));
            if let Some(plaintext) = self.try_encrypted_keys(data, algorithm, siblings) {
                return Ok(plaintext);
            }
        }

        Err(SecurityError::DecryptionFailed(format!(
            "no usable data encryption key for {}",
            data.id
        )))
    }

    fn try_data_key_resolver(
        &self,
        data: &EncryptedData,
        algorithm: BlockEncryptionAlgorithm,
    ) -> Option<Vec<u8>> {
        let resolver = self.data_key_resolver.as_ref()?;
        let key_info = data.key_info.as_ref()?;

        let candidates = match resolver.resolve(&key_criteria(Some(key_info))) {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!(error = %e, "data encryption key resolution failed");
                return None;
            }
        };
        candidates.iter().find_map(|credential| {
            let key = credential.secret_key()?;
            decrypt_block(algorithm, key, &data.cipher_value)
        })
    }

    fn try_encrypted_keys<'k>(
        &self,
        data: &EncryptedData,
        algorithm: BlockEncryptionAlgorithm,
        keys: impl Iterator<Item = &'k EncryptedKey>,
    ) -> Option<Vec<u8>> {
        for encrypted_key in keys {
            match self.decrypt_key(encrypted_key, &data.encryption_method) {
                Ok(key) => {
                    if let Some(plaintext) = decrypt_block(algorithm, &key, &data.cipher_value) {
                        return Some(plaintext);
                    }
                }
                Err(e) => tracing::debug!(
                    id = %encrypted_key.id,
                    error = %e,
                    "skipping encrypted key"
                ),
            }
        }
        None
    }
}

impl std::fmt::Debug for Decrypter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Decrypter")
            .field("recipients", &self.recipients)
            .finish_non_exhaustive()
    }
}

fn block_algorithm(uri: &str) -> SecurityResult<BlockEncryptionAlgorithm> {
    BlockEncryptionAlgorithm::from_uri(uri).ok_or_else(|| {
        SecurityError::unsupported(format!("unsupported block encryption algorithm: {uri}"))
    })
}

fn key_criteria(key_info: Option<&KeyInfo>) -> CriteriaSet {
    let mut criteria = CriteriaSet::new().with_usage(UsageType::Encryption);
    if let Some(key_info) = key_info {
        criteria.key_names.clone_from(&key_info.key_names);
        criteria.key_info = Some(key_info.clone());
    }
    criteria
}

fn decrypt_block(
    algorithm: BlockEncryptionAlgorithm,
    key: &[u8],
    cipher_value: &[u8],
) -> Option<Vec<u8>> {
    match cipher::decrypt_block(algorithm, key, cipher_value) {
        Ok(mut plaintext) => Some(std::mem::take(&mut *plaintext)),
        Err(e) => {
            tracing::debug!(error = %e, "candidate key did not decrypt data");
            None
        }
    }
}
