//! # fedsec-crypto
//!
//! Raw cryptographic primitives for XML Signature and XML Encryption, built
//! on aws-lc-rs.
//!
//! Everything here is keyed by the algorithm identifiers used on the wire
//! (XML-DSig / XML-Enc URIs and X.509 signature OIDs). No trust decisions are
//! made in this crate: a verification either succeeds, fails, or cannot be
//! attempted with the supplied key.
//!
//! - [`algorithm`] - Algorithm URI registry
//! - [`hash`] - Message digests
//! - [`signature`] - Sign / verify for RSA, ECDSA and HMAC
//! - [`cipher`] - AES-GCM, AES key wrap and RSA-OAEP key transport
//! - [`keys`] - `SubjectPublicKeyInfo` inspection and key generation
//! - [`random`] - Secure randomness
//!
//! ## NIST 800-53 Rev5 Controls
//!
//! - SC-12: Cryptographic key management
//! - SC-13: Cryptographic protection

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod algorithm;
pub mod cipher;
pub mod error;
pub mod hash;
pub mod keys;
pub mod random;
pub mod signature;

pub use algorithm::{
    BlockEncryptionAlgorithm, DigestAlgorithm, KeyEncryptionAlgorithm, SignatureAlgorithm,
};
pub use error::{CryptoError, CryptoResult};
pub use hash::{digest, sha256, sha256_hex};
pub use keys::{PublicKeyInfo, PublicKeyType};
pub use signature::{SigningKey, VerificationKey};
