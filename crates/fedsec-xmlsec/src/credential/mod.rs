//! Credentials and credential resolution.
//!
//! A [`Credential`] wraps key material together with the metadata used to
//! select it: the owning entity, the intended [`UsageType`] and key names.
//! Credentials are immutable once built and are shared as
//! `Arc<Credential>` across concurrent evaluations.

mod criteria;
mod generator;
mod keyinfo;
mod resolver;

pub use criteria::CriteriaSet;
pub use generator::{BasicKeyInfoGenerator, KeyInfoGenerator};
pub use keyinfo::KeyInfo;
pub use resolver::{
    ChainingCredentialResolver, CredentialResolver, KeyInfoCredentialResolver,
    StaticCredentialResolver,
};

use std::fmt;

use fedsec_crypto::keys::certificate_spki;
use fedsec_crypto::{PublicKeyInfo, SigningKey, VerificationKey};
use zeroize::Zeroizing;

use crate::error::{SecurityError, SecurityResult};

/// What a credential may be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UsageType {
    /// Signing and signature verification.
    Signing,
    /// Encryption and key transport.
    Encryption,
    /// Any use.
    #[default]
    Unspecified,
}

impl UsageType {
    /// Returns true if a credential with this usage satisfies `wanted`.
    ///
    /// `Unspecified` on either side matches anything.
    #[must_use]
    pub fn satisfies(self, wanted: Self) -> bool {
        self == Self::Unspecified || wanted == Self::Unspecified || self == wanted
    }
}

/// Key material held by a credential.
#[derive(Clone)]
pub enum KeyMaterial {
    /// Public key, optional private key and optional certificate chain.
    Asymmetric {
        /// DER `SubjectPublicKeyInfo`.
        public_key: Vec<u8>,
        /// PKCS#8 DER private key.
        private_key: Option<Zeroizing<Vec<u8>>>,
        /// DER certificates, entity certificate first.
        certificates: Vec<Vec<u8>>,
    },
    /// Shared secret key.
    Symmetric {
        /// Raw key bytes.
        secret: Zeroizing<Vec<u8>>,
    },
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asymmetric {
                public_key,
                private_key,
                certificates,
            } => f
                .debug_struct("Asymmetric")
                .field("public_key_len", &public_key.len())
                .field("has_private_key", &private_key.is_some())
                .field("certificates", &certificates.len())
                .finish(),
            Self::Symmetric { secret } => f
                .debug_struct("Symmetric")
                .field("secret_len", &secret.len())
                .finish(),
        }
    }
}

/// A security credential.
///
/// # Example
///
/// ```rust,ignore
/// let credential = Credential::from_certificate(cert_der)?
///     .with_private_key(key_pkcs8)?
///     .with_entity_id("https://idp.example.org")
///     .with_usage(UsageType::Signing);
/// ```
#[derive(Debug, Clone)]
pub struct Credential {
    entity_id: Option<String>,
    usage: UsageType,
    key_names: Vec<String>,
    material: KeyMaterial,
}

impl Credential {
    /// Creates a credential from a DER X.509 certificate.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityError::InvalidCredential`] if the certificate cannot
    /// be parsed.
    pub fn from_certificate(certificate: impl Into<Vec<u8>>) -> SecurityResult<Self> {
        Self::from_certificate_chain(vec![certificate.into()])
    }

    /// Creates a credential from a DER certificate chain, entity certificate
    /// first.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityError::InvalidCredential`] if the chain is empty or
    /// the entity certificate cannot be parsed.
    pub fn from_certificate_chain(certificates: Vec<Vec<u8>>) -> SecurityResult<Self> {
        let entity = certificates
            .first()
            .ok_or_else(|| SecurityError::InvalidCredential("empty certificate chain".into()))?;
        let public_key = certificate_spki(entity)
            .map_err(|e| SecurityError::InvalidCredential(e.to_string()))?;

        Ok(Self::with_material(KeyMaterial::Asymmetric {
            public_key,
            private_key: None,
            certificates,
        }))
    }

    /// Creates a credential from a bare DER `SubjectPublicKeyInfo`.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityError::InvalidCredential`] if the key is malformed
    /// or of an unsupported type.
    pub fn from_public_key(public_key: impl Into<Vec<u8>>) -> SecurityResult<Self> {
        let public_key = public_key.into();
        PublicKeyInfo::from_spki_der(&public_key)
            .map_err(|e| SecurityError::InvalidCredential(e.to_string()))?;

        Ok(Self::with_material(KeyMaterial::Asymmetric {
            public_key,
            private_key: None,
            certificates: Vec::new(),
        }))
    }

    /// Creates a credential from a shared secret.
    #[must_use]
    pub fn from_secret(secret: impl Into<Vec<u8>>) -> Self {
        Self::with_material(KeyMaterial::Symmetric {
            secret: Zeroizing::new(secret.into()),
        })
    }

    fn with_material(material: KeyMaterial) -> Self {
        Self {
            entity_id: None,
            usage: UsageType::Unspecified,
            key_names: Vec::new(),
            material,
        }
    }

    /// Attaches the PKCS#8 DER private key for an asymmetric credential.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityError::InvalidCredential`] for symmetric credentials.
    pub fn with_private_key(mut self, pkcs8: impl Into<Vec<u8>>) -> SecurityResult<Self> {
        match &mut self.material {
            KeyMaterial::Asymmetric { private_key, .. } => {
                *private_key = Some(Zeroizing::new(pkcs8.into()));
                Ok(self)
            }
            KeyMaterial::Symmetric { .. } => Err(SecurityError::InvalidCredential(
                "symmetric credentials have no private key".into(),
            )),
        }
    }

    /// Sets the usage type.
    #[must_use]
    pub fn with_usage(mut self, usage: UsageType) -> Self {
        self.usage = usage;
        self
    }

    /// Sets the owning entity id.
    #[must_use]
    pub fn with_entity_id(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Adds a key name.
    #[must_use]
    pub fn with_key_name(mut self, name: impl Into<String>) -> Self {
        self.key_names.push(name.into());
        self
    }

    /// Returns the owning entity id.
    #[must_use]
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Returns the usage type.
    #[must_use]
    pub const fn usage(&self) -> UsageType {
        self.usage
    }

    /// Returns the key names.
    #[must_use]
    pub fn key_names(&self) -> &[String] {
        &self.key_names
    }

    /// Returns the key material.
    #[must_use]
    pub const fn material(&self) -> &KeyMaterial {
        &self.material
    }

    /// Returns the DER `SubjectPublicKeyInfo`, if asymmetric.
    #[must_use]
    pub fn public_key(&self) -> Option<&[u8]> {
        match &self.material {
            KeyMaterial::Asymmetric { public_key, .. } => Some(public_key.as_slice()),
            KeyMaterial::Symmetric { .. } => None,
        }
    }

    /// Returns the PKCS#8 DER private key, if present.
    #[must_use]
    pub fn private_key(&self) -> Option<&[u8]> {
        match &self.material {
            KeyMaterial::Asymmetric { private_key, .. } => {
                private_key.as_deref().map(Vec::as_slice)
            }
            KeyMaterial::Symmetric { .. } => None,
        }
    }

    /// Returns the shared secret, if symmetric.
    #[must_use]
    pub fn secret_key(&self) -> Option<&[u8]> {
        match &self.material {
            KeyMaterial::Symmetric { secret } => Some(secret.as_slice()),
            KeyMaterial::Asymmetric { .. } => None,
        }
    }

    /// Returns the certificate chain, entity certificate first.
    #[must_use]
    pub fn certificates(&self) -> &[Vec<u8>] {
        match &self.material {
            KeyMaterial::Asymmetric { certificates, .. } => certificates,
            KeyMaterial::Symmetric { .. } => &[],
        }
    }

    /// Returns the entity certificate, if this is an X.509 credential.
    #[must_use]
    pub fn entity_certificate(&self) -> Option<&[u8]> {
        self.certificates().first().map(Vec::as_slice)
    }

    /// Returns the key for signature verification.
    #[must_use]
    pub fn verification_key(&self) -> VerificationKey<'_> {
        match &self.material {
            KeyMaterial::Asymmetric { public_key, .. } => {
                VerificationKey::Public(public_key.as_slice())
            }
            KeyMaterial::Symmetric { secret } => VerificationKey::Secret(secret.as_slice()),
        }
    }

    /// Returns the key for signing, if this credential can sign.
    #[must_use]
    pub fn signing_key(&self) -> Option<SigningKey<'_>> {
        match &self.material {
            KeyMaterial::Asymmetric { private_key, .. } => {
                private_key.as_deref().map(|k| SigningKey::Pkcs8(k.as_slice()))
            }
            KeyMaterial::Symmetric { secret } => Some(SigningKey::Secret(secret.as_slice())),
        }
    }

    /// Returns true if both credentials hold the same key.
    ///
    /// Public keys compare by `SubjectPublicKeyInfo` bytes; secrets compare
    /// in constant time. Metadata and certificates are ignored.
    #[must_use]
    pub fn same_key_material(&self, other: &Self) -> bool {
        match (&self.material, &other.material) {
            (
                KeyMaterial::Asymmetric { public_key: a, .. },
                KeyMaterial::Asymmetric { public_key: b, .. },
            ) => a == b,
            (KeyMaterial::Symmetric { secret: a }, KeyMaterial::Symmetric { secret: b }) => {
                aws_lc_rs::constant_time::verify_slices_are_equal(a, b).is_ok()
            }
            _ => false,
        }
    }
}
