//! XML Security algorithm identifiers.
//!
//! Maps the algorithm URIs defined by XML Signature, XML Encryption 1.1 and
//! RFC 4051 to typed enums. Anything not listed here is rejected by the
//! primitives rather than guessed at.

use serde::{Deserialize, Serialize};

// ============================================================================
// Algorithm URIs
// ============================================================================

/// Signature algorithm URIs.
pub mod signature_algorithms {
    /// RSA with SHA-1 (deprecated).
    pub const RSA_SHA1: &str = "http://www.w3.org/2000/09/xmldsig#rsa-sha1";

    /// RSA with SHA-256.
    pub const RSA_SHA256: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha256";

    /// RSA with SHA-384.
    pub const RSA_SHA384: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha384";

    /// RSA with SHA-512.
    pub const RSA_SHA512: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha512";

    /// ECDSA with SHA-256.
    pub const ECDSA_SHA256: &str = "http://www.w3.org/2001/04/xmldsig-more#ecdsa-sha256";

    /// ECDSA with SHA-384.
    pub const ECDSA_SHA384: &str = "http://www.w3.org/2001/04/xmldsig-more#ecdsa-sha384";

    /// ECDSA with SHA-512.
    pub const ECDSA_SHA512: &str = "http://www.w3.org/2001/04/xmldsig-more#ecdsa-sha512";

    /// HMAC with SHA-256.
    pub const HMAC_SHA256: &str = "http://www.w3.org/2001/04/xmldsig-more#hmac-sha256";

    /// HMAC with SHA-384.
    pub const HMAC_SHA384: &str = "http://www.w3.org/2001/04/xmldsig-more#hmac-sha384";

    /// HMAC with SHA-512.
    pub const HMAC_SHA512: &str = "http://www.w3.org/2001/04/xmldsig-more#hmac-sha512";
}

/// Digest algorithm URIs.
pub mod digest_algorithms {
    /// SHA-1 (deprecated).
    pub const SHA1: &str = "http://www.w3.org/2000/09/xmldsig#sha1";

    /// SHA-256.
    pub const SHA256: &str = "http://www.w3.org/2001/04/xmlenc#sha256";

    /// SHA-384.
    pub const SHA384: &str = "http://www.w3.org/2001/04/xmldsig-more#sha384";

    /// SHA-512.
    pub const SHA512: &str = "http://www.w3.org/2001/04/xmlenc#sha512";
}

/// Block encryption algorithm URIs.
pub mod block_encryption_algorithms {
    /// AES-128 in GCM mode.
    pub const AES128_GCM: &str = "http://www.w3.org/2009/xmlenc11#aes128-gcm";

    /// AES-256 in GCM mode.
    pub const AES256_GCM: &str = "http://www.w3.org/2009/xmlenc11#aes256-gcm";
}

/// Key transport and key wrap algorithm URIs.
pub mod key_encryption_algorithms {
    /// RSA-OAEP with MGF1-SHA1 and SHA-1 digest.
    pub const RSA_OAEP_MGF1P: &str = "http://www.w3.org/2001/04/xmlenc#rsa-oaep-mgf1p";

    /// AES-128 key wrap (RFC 3394).
    pub const KW_AES128: &str = "http://www.w3.org/2001/04/xmlenc#kw-aes128";

    /// AES-256 key wrap (RFC 3394).
    pub const KW_AES256: &str = "http://www.w3.org/2001/04/xmlenc#kw-aes256";
}

// ============================================================================
// Digest
// ============================================================================

/// Message digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestAlgorithm {
    /// SHA-1 (verification of legacy signatures only).
    Sha1,
    /// SHA-256.
    Sha256,
    /// SHA-384.
    Sha384,
    /// SHA-512.
    Sha512,
}

impl DigestAlgorithm {
    /// Returns the XML-DSig URI.
    #[must_use]
    pub const fn uri(self) -> &'static str {
        match self {
            Self::Sha1 => digest_algorithms::SHA1,
            Self::Sha256 => digest_algorithms::SHA256,
            Self::Sha384 => digest_algorithms::SHA384,
            Self::Sha512 => digest_algorithms::SHA512,
        }
    }

    /// Parses a digest algorithm from its URI.
    #[must_use]
    pub fn from_uri(uri: &str) -> Option<Self> {
        match uri {
            digest_algorithms::SHA1 => Some(Self::Sha1),
            digest_algorithms::SHA256 => Some(Self::Sha256),
            digest_algorithms::SHA384 => Some(Self::Sha384),
            digest_algorithms::SHA512 => Some(Self::Sha512),
            _ => None,
        }
    }

    /// Returns the output length in bytes.
    #[must_use]
    pub const fn output_len(self) -> usize {
        match self {
            Self::Sha1 => 20,
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }
}

// ============================================================================
// Signature
// ============================================================================

/// Signature algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SignatureAlgorithm {
    /// Legacy RSA with SHA-1 (not recommended).
    RsaSha1,
    /// RSA PKCS#1 v1.5 with SHA-256.
    #[default]
    RsaSha256,
    /// RSA PKCS#1 v1.5 with SHA-384.
    RsaSha384,
    /// RSA PKCS#1 v1.5 with SHA-512.
    RsaSha512,
    /// ECDSA with SHA-256.
    EcdsaSha256,
    /// ECDSA with SHA-384.
    EcdsaSha384,
    /// ECDSA with SHA-512.
    EcdsaSha512,
    /// HMAC with SHA-256.
    HmacSha256,
    /// HMAC with SHA-384.
    HmacSha384,
    /// HMAC with SHA-512.
    HmacSha512,
}

impl SignatureAlgorithm {
    /// Returns the URI for this signature algorithm.
    #[must_use]
    pub const fn uri(self) -> &'static str {
        match self {
            Self::RsaSha1 => signature_algorithms::RSA_SHA1,
            Self::RsaSha256 => signature_algorithms::RSA_SHA256,
            Self::RsaSha384 => signature_algorithms::RSA_SHA384,
            Self::RsaSha512 => signature_algorithms::RSA_SHA512,
            Self::EcdsaSha256 => signature_algorithms::ECDSA_SHA256,
            Self::EcdsaSha384 => signature_algorithms::ECDSA_SHA384,
            Self::EcdsaSha512 => signature_algorithms::ECDSA_SHA512,
            Self::HmacSha256 => signature_algorithms::HMAC_SHA256,
            Self::HmacSha384 => signature_algorithms::HMAC_SHA384,
            Self::HmacSha512 => signature_algorithms::HMAC_SHA512,
        }
    }

    /// Parses a signature algorithm from its URI.
    #[must_use]
    pub fn from_uri(uri: &str) -> Option<Self> {
        match uri {
            signature_algorithms::RSA_SHA1 => Some(Self::RsaSha1),
            signature_algorithms::RSA_SHA256 => Some(Self::RsaSha256),
            signature_algorithms::RSA_SHA384 => Some(Self::RsaSha384),
            signature_algorithms::RSA_SHA512 => Some(Self::RsaSha512),
            signature_algorithms::ECDSA_SHA256 => Some(Self::EcdsaSha256),
            signature_algorithms::ECDSA_SHA384 => Some(Self::EcdsaSha384),
            signature_algorithms::ECDSA_SHA512 => Some(Self::EcdsaSha512),
            signature_algorithms::HMAC_SHA256 => Some(Self::HmacSha256),
            signature_algorithms::HMAC_SHA384 => Some(Self::HmacSha384),
            signature_algorithms::HMAC_SHA512 => Some(Self::HmacSha512),
            _ => None,
        }
    }

    /// Returns the digest used by this signature algorithm.
    #[must_use]
    pub const fn digest(self) -> DigestAlgorithm {
        match self {
            Self::RsaSha1 => DigestAlgorithm::Sha1,
            Self::RsaSha256 | Self::EcdsaSha256 | Self::HmacSha256 => DigestAlgorithm::Sha256,
            Self::RsaSha384 | Self::EcdsaSha384 | Self::HmacSha384 => DigestAlgorithm::Sha384,
            Self::RsaSha512 | Self::EcdsaSha512 | Self::HmacSha512 => DigestAlgorithm::Sha512,
        }
    }

    /// Returns true if this algorithm uses RSA.
    #[must_use]
    pub const fn is_rsa(self) -> bool {
        matches!(
            self,
            Self::RsaSha1 | Self::RsaSha256 | Self::RsaSha384 | Self::RsaSha512
        )
    }

    /// Returns true if this algorithm uses ECDSA.
    #[must_use]
    pub const fn is_ecdsa(self) -> bool {
        matches!(self, Self::EcdsaSha256 | Self::EcdsaSha384 | Self::EcdsaSha512)
    }

    /// Returns true if this algorithm is a MAC keyed by a shared secret.
    #[must_use]
    pub const fn is_hmac(self) -> bool {
        matches!(self, Self::HmacSha256 | Self::HmacSha384 | Self::HmacSha512)
    }

    /// Returns true if this algorithm uses a deprecated hash (SHA-1).
    #[must_use]
    pub const fn is_deprecated(self) -> bool {
        matches!(self, Self::RsaSha1)
    }
}

// ============================================================================
// Encryption
// ============================================================================

/// Block encryption algorithms for `EncryptedData`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BlockEncryptionAlgorithm {
    /// AES-128-GCM.
    Aes128Gcm,
    /// AES-256-GCM.
    #[default]
    Aes256Gcm,
}

impl BlockEncryptionAlgorithm {
    /// Returns the XML-Enc URI.
    #[must_use]
    pub const fn uri(self) -> &'static str {
        match self {
            Self::Aes128Gcm => block_encryption_algorithms::AES128_GCM,
            Self::Aes256Gcm => block_encryption_algorithms::AES256_GCM,
        }
    }

    /// Parses a block encryption algorithm from its URI.
    #[must_use]
    pub fn from_uri(uri: &str) -> Option<Self> {
        match uri {
            block_encryption_algorithms::AES128_GCM => Some(Self::Aes128Gcm),
            block_encryption_algorithms::AES256_GCM => Some(Self::Aes256Gcm),
            _ => None,
        }
    }

    /// Returns the required key length in bytes.
    #[must_use]
    pub const fn key_len(self) -> usize {
        match self {
            Self::Aes128Gcm => 16,
            Self::Aes256Gcm => 32,
        }
    }
}

/// Algorithms for encrypting a data encryption key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyEncryptionAlgorithm {
    /// RSA-OAEP key transport (SHA-1, MGF1-SHA1).
    RsaOaepMgf1p,
    /// AES-128 key wrap.
    KwAes128,
    /// AES-256 key wrap.
    KwAes256,
}

impl KeyEncryptionAlgorithm {
    /// Returns the XML-Enc URI.
    #[must_use]
    pub const fn uri(self) -> &'static str {
        match self {
            Self::RsaOaepMgf1p => key_encryption_algorithms::RSA_OAEP_MGF1P,
            Self::KwAes128 => key_encryption_algorithms::KW_AES128,
            Self::KwAes256 => key_encryption_algorithms::KW_AES256,
        }
    }

    /// Parses a key encryption algorithm from its URI.
    #[must_use]
    pub fn from_uri(uri: &str) -> Option<Self> {
        match uri {
            key_encryption_algorithms::RSA_OAEP_MGF1P => Some(Self::RsaOaepMgf1p),
            key_encryption_algorithms::KW_AES128 => Some(Self::KwAes128),
            key_encryption_algorithms::KW_AES256 => Some(Self::KwAes256),
            _ => None,
        }
    }

    /// Returns true for symmetric key wrap algorithms.
    #[must_use]
    pub const fn is_key_wrap(self) -> bool {
        matches!(self, Self::KwAes128 | Self::KwAes256)
    }

    /// Returns the key encryption key length in bytes, for key wrap.
    #[must_use]
    pub const fn kek_len(self) -> Option<usize> {
        match self {
            Self::RsaOaepMgf1p => None,
            Self::KwAes128 => Some(16),
            Self::KwAes256 => Some(32),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_algorithm_uri_parsing() {
        for alg in [
            SignatureAlgorithm::RsaSha1,
            SignatureAlgorithm::RsaSha256,
            SignatureAlgorithm::EcdsaSha384,
            SignatureAlgorithm::HmacSha512,
        ] {
            assert_eq!(SignatureAlgorithm::from_uri(alg.uri()), Some(alg));
        }
        assert_eq!(SignatureAlgorithm::from_uri("urn:unknown"), None);
    }

    #[test]
    fn signature_algorithm_families() {
        assert!(SignatureAlgorithm::RsaSha256.is_rsa());
        assert!(!SignatureAlgorithm::RsaSha256.is_ecdsa());
        assert!(SignatureAlgorithm::EcdsaSha512.is_ecdsa());
        assert!(SignatureAlgorithm::HmacSha256.is_hmac());
        assert!(SignatureAlgorithm::RsaSha1.is_deprecated());
        assert_eq!(
            SignatureAlgorithm::EcdsaSha384.digest(),
            DigestAlgorithm::Sha384
        );
    }

    #[test]
    fn block_encryption_key_lengths() {
        assert_eq!(BlockEncryptionAlgorithm::Aes128Gcm.key_len(), 16);
        assert_eq!(BlockEncryptionAlgorithm::Aes256Gcm.key_len(), 32);
        assert_eq!(
            BlockEncryptionAlgorithm::from_uri(
                "http://www.w3.org/2001/04/xmlenc#aes128-cbc"
            ),
            None
        );
    }

    #[test]
    fn key_encryption_families() {
        assert!(KeyEncryptionAlgorithm::KwAes256.is_key_wrap());
        assert!(!KeyEncryptionAlgorithm::RsaOaepMgf1p.is_key_wrap());
        assert_eq!(KeyEncryptionAlgorithm::KwAes128.kek_len(), Some(16));
        assert_eq!(KeyEncryptionAlgorithm::RsaOaepMgf1p.kek_len(), None);
    }

    #[test]
    fn digest_output_lengths() {
        assert_eq!(DigestAlgorithm::Sha1.output_len(), 20);
        assert_eq!(
            DigestAlgorithm::from_uri(DigestAlgorithm::Sha512.uri()),
            Some(DigestAlgorithm::Sha512)
        );
    }
}
