//! Producing `EncryptedData` and `EncryptedKey`.

use std::sync::Arc;

use fedsec_core::config::EncryptionConfig;
use fedsec_core::event::{EventType, SecurityEvent};
use fedsec_crypto::algorithm::{BlockEncryptionAlgorithm, KeyEncryptionAlgorithm};
use fedsec_crypto::{cipher, random};
use zeroize::Zeroizing;

use super::{EncryptedData, EncryptedKey, EncryptionType};
use crate::credential::{Credential, KeyInfoGenerator};
use crate::error::{SecurityError, SecurityResult};

/// Parameters for encrypting content.
#[derive(Clone)]
pub struct EncryptionParameters {
    /// Block encryption algorithm URI.
    pub algorithm: String,
    /// Symmetric data encryption key. Generated when absent.
    pub credential: Option<Arc<Credential>>,
    /// Describes the data encryption key in the output `KeyInfo`.
    pub key_info_generator: Option<Arc<dyn KeyInfoGenerator>>,
}

impl EncryptionParameters {
    /// Creates parameters for `algorithm` with a generated key.
    #[must_use]
    pub fn new(algorithm: impl Into<String>) -> Self {
        Self {
            algorithm: algorithm.into(),
            credential: None,
            key_info_generator: None,
        }
    }

    /// Creates parameters using the configured data algorithm.
    #[must_use]
    pub fn from_config(config: &EncryptionConfig) -> Self {
        Self::new(config.data_algorithm.clone())
    }

    /// Uses an explicit data encryption key.
    #[must_use]
    pub fn with_credential(mut self, credential: Arc<Credential>) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Sets the key info generator.
    #[must_use]
    pub fn with_key_info_generator(mut self, generator: Arc<dyn KeyInfoGenerator>) -> Self {
        self.key_info_generator = Some(generator);
        self
    }
}

impl std::fmt::Debug for EncryptionParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionParameters")
            .field("algorithm", &self.algorithm)
            .field("has_credential", &self.credential.is_some())
            .finish_non_exhaustive()
    }
}

/// Parameters for wrapping the data encryption key for one recipient.
#[derive(Clone)]
pub struct KeyEncryptionParameters {
    /// Key transport or key wrap algorithm URI.
    pub algorithm: String,
    /// Key encryption key: an RSA public key or an AES secret.
    pub credential: Arc<Credential>,
    /// `Recipient` attribute for the produced `EncryptedKey`.
    pub recipient: Option<String>,
    /// Describes the key encryption key in the `EncryptedKey`'s `KeyInfo`.
    pub key_info_generator: Option<Arc<dyn KeyInfoGenerator>>,
}

impl KeyEncryptionParameters {
    /// Creates parameters wrapping with `credential` under `algorithm`.
    #[must_use]
    pub fn new(algorithm: impl Into<String>, credential: Arc<Credential>) -> Self {
        Self {
            algorithm: algorithm.into(),
            credential,
            recipient: None,
            key_info_generator: None,
        }
    }

    /// Creates parameters using the configured algorithm for the kind of
    /// key `credential` holds.
    #[must_use]
    pub fn from_config(config: &EncryptionConfig, credential: Arc<Credential>) -> Self {
        let algorithm = if credential.secret_key().is_some() {
            config.key_wrap_algorithm.clone()
        } else {
            config.key_transport_algorithm.clone()
        };
        Self::new(algorithm, credential)
    }

    /// Sets the intended recipient.
    #[must_use]
    pub fn with_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipient = Some(recipient.into());
        self
    }

    /// Sets the key info generator.
    #[must_use]
    pub fn with_key_info_generator(mut self, generator: Arc<dyn KeyInfoGenerator>) -> Self {
        self.key_info_generator = Some(generator);
        self
    }
}

impl std::fmt::Debug for KeyEncryptionParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyEncryptionParameters")
            .field("algorithm", &self.algorithm)
            .field("recipient", &self.recipient)
            .finish_non_exhaustive()
    }
}

/// Encrypts content and keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct Encrypter;

impl Encrypter {
    /// Creates an encrypter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Encrypts a serialized element.
    ///
    /// # Errors
    ///
    /// See [`encrypt_content`](Self::encrypt_content).
    pub fn encrypt_element(
        &self,
        plaintext: &[u8],
        params: &EncryptionParameters,
        kek_params: &[KeyEncryptionParameters],
    ) -> SecurityResult<EncryptedData> {
        self.encrypt(plaintext, EncryptionType::Element, params, kek_params)
    }

    /// Encrypts the serialized content of an element.
    ///
    /// # Errors
    ///
    /// - [`SecurityError::PreconditionViolation`] if the algorithm URI is
    ///   empty, or if the key is generated and `kek_params` is empty
    /// - [`SecurityError::UnsupportedOperation`] for an unknown algorithm URI
    /// - [`SecurityError::EncryptionFailed`] if a key is unusable
    pub fn encrypt_content(
        &self,
        plaintext: &[u8],
        params: &EncryptionParameters,
        kek_params: &[KeyEncryptionParameters],
    ) -> SecurityResult<EncryptedData> {
        self.encrypt(plaintext, EncryptionType::Content, params, kek_params)
    }

    fn encrypt(
        &self,
        plaintext: &[u8],
        encrypted_type: EncryptionType,
        params: &EncryptionParameters,
        kek_params: &[KeyEncryptionParameters],
    ) -> SecurityResult<EncryptedData> {
        let algorithm = check_params(params, kek_params)?;

        let data_key: Zeroizing<Vec<u8>> = match &params.credential {
            Some(credential) => {
                let secret = credential.secret_key().ok_or_else(|| {
                    SecurityError::EncryptionFailed(
                        "data encryption credential holds no secret key".to_string(),
                    )
                })?;
                Zeroizing::new(secret.to_vec())
            }
            None => random::generate_key(algorithm.key_len()),
        };

        let cipher_value = cipher::encrypt_block(algorithm, &data_key, plaintext)
            .map_err(|e| SecurityError::EncryptionFailed(e.to_string()))?;

        let mut key_info = match (&params.key_info_generator, &params.credential) {
            (Some(generator), Some(credential)) => generator.generate(credential)?,
            _ => None,
        }
        .unwrap_or_default();

        for kek in kek_params {
            key_info
                .encrypted_keys
                .push(self.encrypt_key(&data_key, kek)?);
        }

        let encrypted = EncryptedData {
            id: random::generate_xml_id(),
            encrypted_type,
            encryption_method: params.algorithm.clone(),
            key_info: (!key_info.is_empty()).then_some(key_info),
            cipher_value,
        };

        tracing::debug!(
            id = %encrypted.id,
            algorithm = %params.algorithm,
            keys = kek_params.len(),
            "encrypted data"
        );
        SecurityEvent::builder(EventType::Encryption)
            .detail("algorithm", params.algorithm.as_str())
            .detail("encrypted_keys", kek_params.len().to_string())
            .emit();

        Ok(encrypted)
    }

    /// Wraps `key` for one recipient.
    ///
    /// # Errors
    ///
    /// - [`SecurityError::UnsupportedOperation`] for an unknown algorithm URI
    /// - [`SecurityError::EncryptionFailed`] if the key encryption key is
    ///   missing or unusable
    pub fn encrypt_key(
        &self,
        key: &[u8],
        params: &KeyEncryptionParameters,
    ) -> SecurityResult<EncryptedKey> {
        let algorithm = KeyEncryptionAlgorithm::from_uri(&params.algorithm).ok_or_else(|| {
            SecurityError::unsupported(format!(
                "unsupported key encryption algorithm: {}",
                params.algorithm
            ))
        })?;

        let kek = if algorithm.is_key_wrap() {
            params.credential.secret_key()
        } else {
            params.credential.public_key()
        }
        .ok_or_else(|| {
            SecurityError::EncryptionFailed(format!(
                "credential holds no key usable with {}",
                params.algorithm
            ))
        })?;

        let cipher_value = cipher::encrypt_key(algorithm, kek, key)
            .map_err(|e| SecurityError::EncryptionFailed(e.to_string()))?;

        let key_info = params
            .key_info_generator
            .as_ref()
            .map(|generator| generator.generate(&params.credential))
            .transpose()?
            .flatten();

        Ok(EncryptedKey {
            id: random::generate_xml_id(),
            recipient: params.recipient.clone(),
            encryption_method: params.algorithm.clone(),
            key_info,
            cipher_value,
            carried_key_name: None,
        })
    }
}

fn check_params(
    params: &EncryptionParameters,
    kek_params: &[KeyEncryptionParameters],
) -> SecurityResult<BlockEncryptionAlgorithm> {
    if params.algorithm.is_empty() {
        return Err(SecurityError::precondition("encryption algorithm URI is required"));
    }
    if params.credential.is_none() && kek_params.is_empty() {
        return Err(SecurityError::precondition(
            "a generated data encryption key requires at least one key encryption key",
        ));
    }
    if kek_params.iter().any(|kek| kek.algorithm.is_empty()) {
        return Err(SecurityError::precondition("key encryption algorithm URI is required"));
    }
    BlockEncryptionAlgorithm::from_uri(&params.algorithm).ok_or_else(|| {
        SecurityError::unsupported(format!(
            "unsupported block encryption algorithm: {}",
            params.algorithm
        ))
    })
}
