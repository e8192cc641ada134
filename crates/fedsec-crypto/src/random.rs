//! Cryptographically secure random number generation.
//!
//! This module provides secure random generation for:
//! - Data encryption keys generated by the encrypter
//! - AES-GCM initialization vectors
//! - XML `ID` attribute values
//!
//! All functions use the thread-local generator, which is cryptographically
//! secure by default.

use rand::distr::{Alphanumeric, SampleString};
use rand::Rng;
use zeroize::Zeroizing;

/// Generates a cryptographically secure random byte array.
///
/// # Arguments
///
/// * `len` - Number of random bytes to generate
#[must_use]
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut rng = rand::rng();
    let mut bytes = vec![0u8; len];
    rng.fill(&mut bytes[..]);
    bytes
}

/// Generates a random symmetric key that is wiped when dropped.
#[must_use]
pub fn generate_key(len: usize) -> Zeroizing<Vec<u8>> {
    Zeroizing::new(random_bytes(len))
}

/// Generates a cryptographically secure random alphanumeric string.
#[must_use]
pub fn random_alphanumeric(len: usize) -> String {
    let mut rng = rand::rng();
    Alphanumeric.sample_string(&mut rng, len)
}

/// Generates an XML `ID` value.
///
/// The leading underscore keeps the value a valid `NCName`. The 32 random
/// characters give roughly 190 bits of entropy.
#[must_use]
pub fn generate_xml_id() -> String {
    format!("_{}", random_alphanumeric(32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_bytes_has_requested_length() {
        assert_eq!(random_bytes(12).len(), 12);
        assert_ne!(random_bytes(32), random_bytes(32));
    }

    #[test]
    fn generated_key_length() {
        assert_eq!(generate_key(16).len(), 16);
    }

    #[test]
    fn xml_id_is_ncname() {
        let id = generate_xml_id();
        assert_eq!(id.len(), 33);
        assert!(id.starts_with('_'));
        assert!(id[1..].chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
