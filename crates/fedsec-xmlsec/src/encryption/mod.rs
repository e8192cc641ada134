//! XML Encryption.
//!
//! [`Encrypter`] produces [`EncryptedData`] from plaintext octets and
//! [`Decrypter`] reverses it. Content is encrypted with AES-GCM under a data
//! encryption key, which is itself carried in [`EncryptedKey`]s wrapped with
//! RSA-OAEP or AES key wrap.
//!
//! # Algorithms
//!
//! - Data: AES-128-GCM, AES-256-GCM
//! - Key transport: RSA-OAEP-MGF1P
//! - Key wrap: AES-128-KW, AES-256-KW

mod decrypter;
mod encrypted_key_resolver;
mod encrypter;

pub use decrypter::Decrypter;
pub use encrypted_key_resolver::{
    ChainingEncryptedKeyResolver, EncryptedKeyResolver, InlineEncryptedKeyResolver,
    RetrievalMethodEncryptedKeyResolver,
};
pub use encrypter::{Encrypter, EncryptionParameters, KeyEncryptionParameters};

use crate::constants::encryption_types;
use crate::credential::KeyInfo;

/// What the ciphertext of an [`EncryptedData`] stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncryptionType {
    /// A complete element.
    #[default]
    Element,
    /// The content of an element.
    Content,
}

impl EncryptionType {
    /// Returns the `Type` URI.
    #[must_use]
    pub const fn uri(self) -> &'static str {
        match self {
            Self::Element => encryption_types::ELEMENT,
            Self::Content => encryption_types::CONTENT,
        }
    }

    /// Parses a `Type` URI.
    #[must_use]
    pub fn from_uri(uri: &str) -> Option<Self> {
        match uri {
            encryption_types::ELEMENT => Some(Self::Element),
            encryption_types::CONTENT => Some(Self::Content),
            _ => None,
        }
    }
}

/// `xenc:EncryptedData`.
#[derive(Debug, Clone)]
pub struct EncryptedData {
    /// `Id` attribute.
    pub id: String,
    /// `Type` attribute.
    pub encrypted_type: EncryptionType,
    /// `EncryptionMethod/@Algorithm`.
    pub encryption_method: String,
    /// Key material for the data encryption key.
    pub key_info: Option<KeyInfo>,
    /// IV, ciphertext and tag.
    pub cipher_value: Vec<u8>,
}

/// `xenc:EncryptedKey`.
#[derive(Debug, Clone)]
pub struct EncryptedKey {
    /// `Id` attribute.
    pub id: String,
    /// `Recipient` attribute.
    pub recipient: Option<String>,
    /// `EncryptionMethod/@Algorithm`.
    pub encryption_method: String,
    /// Key material for the key encryption key.
    pub key_info: Option<KeyInfo>,
    /// The wrapped key.
    pub cipher_value: Vec<u8>,
    /// `CarriedKeyName`.
    pub carried_key_name: Option<String>,
}

/// An encrypted SAML element such as `EncryptedAssertion` or `EncryptedID`.
///
/// Keys may sit beside the data instead of inside its `KeyInfo`.
#[derive(Debug, Clone)]
pub struct EncryptedElement {
    /// The encrypted content.
    pub encrypted_data: EncryptedData,
    /// Sibling encrypted keys.
    pub encrypted_keys: Vec<EncryptedKey>,
}

impl EncryptedElement {
    /// Wraps data with no sibling keys.
    #[must_use]
    pub fn new(encrypted_data: EncryptedData) -> Self {
        Self {
            encrypted_data,
            encrypted_keys: Vec::new(),
        }
    }

    /// Moves the inline keys out of the data's `KeyInfo` into siblings,
    /// leaving `RetrievalMethod` references behind.
    #[must_use]
    pub fn with_detached_keys(mut self) -> Self {
        if let Some(key_info) = self.encrypted_data.key_info.as_mut() {
            for key in key_info.encrypted_keys.drain(..) {
                key_info.retrieval_methods.push(format!("#{}", key.id));
                self.encrypted_keys.push(key);
            }
        }
        self
    }
}
