//! Key parsing and generation.
//!
//! Public keys travel through the system as DER `SubjectPublicKeyInfo`. The
//! aws-lc-rs verifiers want the bare key bits instead (a PKCS#1
//! `RSAPublicKey` or an uncompressed EC point), so [`PublicKeyInfo`] splits
//! the two apart and records which family the key belongs to.

use aws_lc_rs::encoding::AsDer;
use aws_lc_rs::rsa::{KeySize, PrivateDecryptingKey};
use x509_parser::prelude::*;
use zeroize::Zeroizing;

use crate::error::{CryptoError, CryptoResult};

const RSA_ENCRYPTION_OID: &str = "1.2.840.113549.1.1.1";
const EC_PUBLIC_KEY_OID: &str = "1.2.840.10045.2.1";

/// Named elliptic curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EcCurve {
    /// NIST P-256.
    P256,
    /// NIST P-384.
    P384,
    /// NIST P-521.
    P521,
}

impl EcCurve {
    /// Identifies the curve from the length of an uncompressed point.
    #[must_use]
    pub const fn from_point_len(len: usize) -> Option<Self> {
        match len {
            65 => Some(Self::P256),
            97 => Some(Self::P384),
            133 => Some(Self::P521),
            _ => None,
        }
    }
}

/// Public key family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PublicKeyType {
    /// RSA.
    Rsa,
    /// Elliptic curve key on the given curve.
    Ec(EcCurve),
}

/// A parsed `SubjectPublicKeyInfo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyInfo {
    key_type: PublicKeyType,
    key_bits: Vec<u8>,
}

impl PublicKeyInfo {
    /// Parses a DER `SubjectPublicKeyInfo`.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKey`] if the structure cannot be parsed,
    /// or [`CryptoError::UnsupportedAlgorithm`] for key types other than RSA
    /// and the NIST EC curves.
    pub fn from_spki_der(der: &[u8]) -> CryptoResult<Self> {
        let (_, spki) = SubjectPublicKeyInfo::from_der(der)
            .map_err(|e| CryptoError::InvalidKey(format!("bad SubjectPublicKeyInfo: {e}")))?;

        let oid = spki.algorithm.algorithm.to_string();
        let key_bits = spki.subject_public_key.data.to_vec();

        let key_type = match oid.as_str() {
            RSA_ENCRYPTION_OID => PublicKeyType::Rsa,
            EC_PUBLIC_KEY_OID => {
                let curve = EcCurve::from_point_len(key_bits.len()).ok_or_else(|| {
                    CryptoError::UnsupportedAlgorithm(format!(
                        "EC point of {} bytes",
                        key_bits.len()
                    ))
                })?;
                PublicKeyType::Ec(curve)
            }
            other => {
                return Err(CryptoError::UnsupportedAlgorithm(format!(
                    "public key algorithm {other}"
                )))
            }
        };

        Ok(Self { key_type, key_bits })
    }

    /// Returns the key family.
    #[must_use]
    pub const fn key_type(&self) -> PublicKeyType {
        self.key_type
    }

    /// Returns the raw key bits from the `subjectPublicKey` BIT STRING.
    #[must_use]
    pub fn key_bits(&self) -> &[u8] {
        &self.key_bits
    }
}

/// Extracts the DER `SubjectPublicKeyInfo` from a DER X.509 certificate.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidKey`] if the certificate cannot be parsed.
pub fn certificate_spki(certificate_der: &[u8]) -> CryptoResult<Vec<u8>> {
    let (_, cert) = X509Certificate::from_der(certificate_der)
        .map_err(|e| CryptoError::InvalidKey(format!("bad X.509 certificate: {e}")))?;
    Ok(cert.tbs_certificate.subject_pki.raw.to_vec())
}

/// An RSA key pair for key transport.
pub struct RsaKeyTransportPair {
    private_key_pkcs8: Zeroizing<Vec<u8>>,
    public_key_spki: Vec<u8>,
}

impl RsaKeyTransportPair {
    /// Generates a 2048-bit RSA key pair.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::KeyGeneration`] if generation or encoding fails.
    pub fn generate() -> CryptoResult<Self> {
        let private = PrivateDecryptingKey::generate(KeySize::Rsa2048)
            .map_err(|e| CryptoError::KeyGeneration(format!("RSA generation failed: {e}")))?;
        let pkcs8 = private
            .as_der()
            .map_err(|e| CryptoError::KeyGeneration(format!("PKCS#8 encoding failed: {e}")))?;
        let spki = private
            .public_key()
            .as_der()
            .map_err(|e| CryptoError::KeyGeneration(format!("SPKI encoding failed: {e}")))?;

        Ok(Self {
            private_key_pkcs8: Zeroizing::new(pkcs8.as_ref().to_vec()),
            public_key_spki: spki.as_ref().to_vec(),
        })
    }

    /// Returns the PKCS#8 DER private key.
    #[must_use]
    pub fn private_key_pkcs8(&self) -> &[u8] {
        &self.private_key_pkcs8
    }

    /// Returns the DER `SubjectPublicKeyInfo`.
    #[must_use]
    pub fn public_key_spki(&self) -> &[u8] {
        &self.public_key_spki
    }
}
