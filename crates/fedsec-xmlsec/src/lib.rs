//! XML Security for SAML 2.0.
//!
//! This crate decides whether signed SAML content can be trusted, and
//! encrypts or decrypts SAML elements. XML parsing and canonicalization are
//! left to the caller: every input here is a typed structure holding
//! already-canonical octets.
//!
//! - **Credentials** - Key material with usage, entity and key-name metadata
//! - **Signature trust** - Resolve candidate keys from `KeyInfo`, verify, then
//!   judge trust under an explicit-key or PKIX trust model
//! - **Encryption** - AES-GCM content encryption with RSA-OAEP or AES key wrap
//! - **Client certificates** - Authenticate a message issuer from its TLS
//!   client certificate
//!
//! # Architecture
//!
//! - [`credential`] - Credentials, criteria, resolvers and `KeyInfo`
//! - [`signature`] - Signature objects, verification and signing
//! - [`trust`] - Trust engine and trust models
//! - [`encryption`] - Encrypter, decrypter and encrypted-key resolvers
//! - [`error`] - Error types
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use fedsec_xmlsec::{
//!     CriteriaSet, ExplicitKeyTrustModel, KeyInfoCredentialResolver, SignatureTrustEngine,
//! };
//!
//! let engine = SignatureTrustEngine::new(
//!     ExplicitKeyTrustModel::new(metadata_resolver),
//!     Arc::new(KeyInfoCredentialResolver::new()),
//! );
//! let trusted = engine.validate(&signature, &CriteriaSet::for_entity(issuer))?;
//! ```
//!
//! # Specifications
//!
//! - [XML Signature](https://www.w3.org/TR/xmldsig-core1/)
//! - [XML Encryption](https://www.w3.org/TR/xmlenc-core1/)
//! - [RFC 5280](https://datatracker.ietf.org/doc/html/rfc5280) certification path validation
//!
//! ## NIST 800-53 Rev5 Controls
//!
//! - IA-5(2): PKI-based authentication
//! - SC-8: Transmission confidentiality and integrity
//! - SC-13: Cryptographic protection
//! - AU-2: Event logging

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod constants;
pub mod credential;
pub mod encryption;
pub mod error;
pub mod signature;
pub mod trust;

#[cfg(test)]
mod test_support;

pub use credential::{
    BasicKeyInfoGenerator, ChainingCredentialResolver, Credential, CredentialResolver,
    CriteriaSet, KeyInfo, KeyInfoCredentialResolver, KeyInfoGenerator, KeyMaterial,
    StaticCredentialResolver, UsageType,
};
pub use encryption::{
    Decrypter, EncryptedData, EncryptedElement, EncryptedKey, EncryptedKeyResolver, Encrypter,
    EncryptionParameters, EncryptionType, KeyEncryptionParameters,
};
pub use error::{SecurityError, SecurityResult};
pub use signature::{Signature, SignatureVerifier, Signer};
pub use trust::{
    ClientCertAuthRule, CredentialTrustEngine, ExplicitKeyTrustModel, PkixTrustModel,
    SignatureTrustEngine, TrustModel,
};
