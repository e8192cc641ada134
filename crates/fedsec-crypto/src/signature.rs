//! Digital signature operations.
//!
//! XML-DSig carries ECDSA signatures in the fixed-width `r || s` form, while
//! X.509 certificates use DER `ECDSA-Sig-Value`. Both encodings are handled
//! here: [`verify`] and [`sign`] for XML, [`verify_certificate_signature`]
//! for certificate paths.
//!
//! Verification returns `Ok(false)` for a signature that does not verify.
//! An `Err` means verification could not be attempted at all (unknown
//! algorithm, unparseable key, key of the wrong family).

use aws_lc_rs::{
    hmac,
    rand::SystemRandom,
    signature::{self, EcdsaKeyPair, RsaKeyPair, UnparsedPublicKey, VerificationAlgorithm},
};

use crate::algorithm::SignatureAlgorithm;
use crate::error::{CryptoError, CryptoResult};
use crate::keys::{EcCurve, PublicKeyInfo, PublicKeyType};

/// Key material usable for verification.
#[derive(Debug, Clone, Copy)]
pub enum VerificationKey<'a> {
    /// DER `SubjectPublicKeyInfo`.
    Public(&'a [u8]),
    /// HMAC shared secret.
    Secret(&'a [u8]),
}

/// Key material usable for signing.
#[derive(Debug, Clone, Copy)]
pub enum SigningKey<'a> {
    /// PKCS#8 DER private key.
    Pkcs8(&'a [u8]),
    /// HMAC shared secret.
    Secret(&'a [u8]),
}

/// Verifies an XML-DSig `SignatureValue` over `data`.
///
/// # Errors
///
/// Returns an error if the key cannot be used with `algorithm`.
pub fn verify(
    algorithm: SignatureAlgorithm,
    key: VerificationKey<'_>,
    data: &[u8],
    sig: &[u8],
) -> CryptoResult<bool> {
    match key {
        VerificationKey::Secret(secret) => {
            let alg = hmac_algorithm(algorithm)?;
            let key = hmac::Key::new(alg, secret);
            Ok(hmac::verify(&key, data, sig).is_ok())
        }
        VerificationKey::Public(spki) => {
            if algorithm.is_hmac() {
                return Err(CryptoError::KeyMismatch(format!(
                    "{} requires a secret key",
                    algorithm.uri()
                )));
            }
            let info = PublicKeyInfo::from_spki_der(spki)?;
            let verification_alg = xml_verification_algorithm(algorithm, info.key_type())?;
            Ok(verify_with(verification_alg, info.key_bits(), data, sig))
        }
    }
}

/// Produces an XML-DSig `SignatureValue` over `data`.
///
/// SHA-1 is accepted for verification only; signing with it is refused.
///
/// # Errors
///
/// Returns an error if the key cannot be used with `algorithm` or the
/// signing operation fails.
pub fn sign(
    algorithm: SignatureAlgorithm,
    key: SigningKey<'_>,
    data: &[u8],
) -> CryptoResult<Vec<u8>> {
    if algorithm.is_deprecated() {
        return Err(CryptoError::UnsupportedAlgorithm(format!(
            "refusing to sign with {}",
            algorithm.uri()
        )));
    }

    match key {
        SigningKey::Secret(secret) => {
            let alg = hmac_algorithm(algorithm)?;
            let key = hmac::Key::new(alg, secret);
            Ok(hmac::sign(&key, data).as_ref().to_vec())
        }
        SigningKey::Pkcs8(pkcs8) if algorithm.is_rsa() => rsa_sign(algorithm, pkcs8, data),
        SigningKey::Pkcs8(pkcs8) if algorithm.is_ecdsa() => ecdsa_sign(algorithm, pkcs8, data),
        SigningKey::Pkcs8(_) => Err(CryptoError::KeyMismatch(format!(
            "{} requires a secret key",
            algorithm.uri()
        ))),
    }
}

/// Verifies an X.509 certificate signature made by the issuer key.
///
/// # Arguments
///
/// * `signature_oid` - The certificate's `signatureAlgorithm` OID in dotted form
/// * `issuer_spki` - Issuer public key as DER `SubjectPublicKeyInfo`
/// * `tbs` - DER `TBSCertificate`
/// * `sig` - Signature BIT STRING contents
///
/// # Errors
///
/// Returns an error for unsupported OIDs or unusable issuer keys.
pub fn verify_certificate_signature(
    signature_oid: &str,
    issuer_spki: &[u8],
    tbs: &[u8],
    sig: &[u8],
) -> CryptoResult<bool> {
    let info = PublicKeyInfo::from_spki_der(issuer_spki)?;
    let verification_alg = certificate_verification_algorithm(signature_oid, info.key_type())?;
    Ok(verify_with(verification_alg, info.key_bits(), tbs, sig))
}

fn verify_with(
    alg: &'static dyn VerificationAlgorithm,
    key_bits: &[u8],
    data: &[u8],
    sig: &[u8],
) -> bool {
    UnparsedPublicKey::new(alg, key_bits).verify(data, sig).is_ok()
}

fn hmac_algorithm(algorithm: SignatureAlgorithm) -> CryptoResult<hmac::Algorithm> {
    match algorithm {
        SignatureAlgorithm::HmacSha256 => Ok(hmac::HMAC_SHA256),
        SignatureAlgorithm::HmacSha384 => Ok(hmac::HMAC_SHA384),
        SignatureAlgorithm::HmacSha512 => Ok(hmac::HMAC_SHA512),
        other => Err(CryptoError::KeyMismatch(format!(
            "{} cannot be used with a secret key",
            other.uri()
        ))),
    }
}

fn xml_verification_algorithm(
    algorithm: SignatureAlgorithm,
    key_type: PublicKeyType,
) -> CryptoResult<&'static dyn VerificationAlgorithm> {
    let alg: &'static dyn VerificationAlgorithm = match (algorithm, key_type) {
        (SignatureAlgorithm::RsaSha1, PublicKeyType::Rsa) => {
            &signature::RSA_PKCS1_2048_8192_SHA1_FOR_LEGACY_USE_ONLY
        }
        (SignatureAlgorithm::RsaSha256, PublicKeyType::Rsa) => {
            &signature::RSA_PKCS1_2048_8192_SHA256
        }
        (SignatureAlgorithm::RsaSha384, PublicKeyType::Rsa) => {
            &signature::RSA_PKCS1_2048_8192_SHA384
        }
        (SignatureAlgorithm::RsaSha512, PublicKeyType::Rsa) => {
            &signature::RSA_PKCS1_2048_8192_SHA512
        }
        (SignatureAlgorithm::EcdsaSha256, PublicKeyType::Ec(EcCurve::P256)) => {
            &signature::ECDSA_P256_SHA256_FIXED
        }
        (SignatureAlgorithm::EcdsaSha384, PublicKeyType::Ec(EcCurve::P384)) => {
            &signature::ECDSA_P384_SHA384_FIXED
        }
        (SignatureAlgorithm::EcdsaSha512, PublicKeyType::Ec(EcCurve::P521)) => {
            &signature::ECDSA_P521_SHA512_FIXED
        }
        (algorithm, key_type) => {
            return Err(CryptoError::KeyMismatch(format!(
                "{} cannot be verified with a {key_type:?} key",
                algorithm.uri()
            )))
        }
    };
    Ok(alg)
}

fn certificate_verification_algorithm(
    oid: &str,
    key_type: PublicKeyType,
) -> CryptoResult<&'static dyn VerificationAlgorithm> {
    let alg: &'static dyn VerificationAlgorithm = match (oid, key_type) {
        // sha{1,256,384,512}WithRSAEncryption
        ("1.2.840.113549.1.1.5", PublicKeyType::Rsa) => {
            &signature::RSA_PKCS1_2048_8192_SHA1_FOR_LEGACY_USE_ONLY
        }
        ("1.2.840.113549.1.1.11", PublicKeyType::Rsa) => &signature::RSA_PKCS1_2048_8192_SHA256,
        ("1.2.840.113549.1.1.12", PublicKeyType::Rsa) => &signature::RSA_PKCS1_2048_8192_SHA384,
        ("1.2.840.113549.1.1.13", PublicKeyType::Rsa) => &signature::RSA_PKCS1_2048_8192_SHA512,
        // ecdsa-with-SHA{256,384,512}
        ("1.2.840.10045.4.3.2", PublicKeyType::Ec(EcCurve::P256)) => {
            &signature::ECDSA_P256_SHA256_ASN1
        }
        ("1.2.840.10045.4.3.2", PublicKeyType::Ec(EcCurve::P384)) => {
            &signature::ECDSA_P384_SHA256_ASN1
        }
        ("1.2.840.10045.4.3.3", PublicKeyType::Ec(EcCurve::P256)) => {
            &signature::ECDSA_P256_SHA384_ASN1
        }
        ("1.2.840.10045.4.3.3", PublicKeyType::Ec(EcCurve::P384)) => {
            &signature::ECDSA_P384_SHA384_ASN1
        }
        ("1.2.840.10045.4.3.4", PublicKeyType::Ec(EcCurve::P521)) => {
            &signature::ECDSA_P521_SHA512_ASN1
        }
        (oid, key_type) => {
            return Err(CryptoError::UnsupportedAlgorithm(format!(
                "certificate signature {oid} with {key_type:?} issuer key"
            )))
        }
    };
    Ok(alg)
}

fn rsa_sign(algorithm: SignatureAlgorithm, pkcs8: &[u8], data: &[u8]) -> CryptoResult<Vec<u8>> {
    let key_pair = RsaKeyPair::from_pkcs8(pkcs8)
        .map_err(|e| CryptoError::InvalidKey(format!("invalid RSA PKCS#8 key: {e}")))?;

    let padding = match algorithm {
        SignatureAlgorithm::RsaSha256 => &signature::RSA_PKCS1_SHA256,
        SignatureAlgorithm::RsaSha384 => &signature::RSA_PKCS1_SHA384,
        SignatureAlgorithm::RsaSha512 => &signature::RSA_PKCS1_SHA512,
        other => {
            return Err(CryptoError::UnsupportedAlgorithm(other.uri().to_string()));
        }
    };

    let rng = SystemRandom::new();
    let mut sig = vec![0u8; key_pair.public_modulus_len()];
    key_pair
        .sign(padding, &rng, data, &mut sig)
        .map_err(|e| CryptoError::Signing(format!("RSA signing failed: {e}")))?;
    Ok(sig)
}

fn ecdsa_sign(algorithm: SignatureAlgorithm, pkcs8: &[u8], data: &[u8]) -> CryptoResult<Vec<u8>> {
    let signing_alg = match algorithm {
        SignatureAlgorithm::EcdsaSha256 => &signature::ECDSA_P256_SHA256_FIXED_SIGNING,
        SignatureAlgorithm::EcdsaSha384 => &signature::ECDSA_P384_SHA384_FIXED_SIGNING,
        SignatureAlgorithm::EcdsaSha512 => &signature::ECDSA_P521_SHA512_FIXED_SIGNING,
        other => {
            return Err(CryptoError::UnsupportedAlgorithm(other.uri().to_string()));
        }
    };

    let key_pair = EcdsaKeyPair::from_pkcs8(signing_alg, pkcs8)
        .map_err(|e| CryptoError::InvalidKey(format!("invalid EC PKCS#8 key: {e}")))?;
    let rng = SystemRandom::new();
    let sig = key_pair
        .sign(&rng, data)
        .map_err(|e| CryptoError::Signing(format!("ECDSA signing failed: {e}")))?;
    Ok(sig.as_ref().to_vec())
}
