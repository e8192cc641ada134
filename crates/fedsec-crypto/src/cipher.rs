//! Block encryption and key encryption primitives.
//!
//! - AES-GCM for `EncryptedData`, with the XML Encryption 1.1 layout
//!   `IV (12 bytes) || ciphertext || tag (16 bytes)`
//! - RFC 3394 AES key wrap
//! - RSA-OAEP (SHA-1, MGF1-SHA1) key transport

use aws_lc_rs::{
    aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_128_GCM, AES_256_GCM, NONCE_LEN},
    key_wrap::{AesKek, KeyWrap, AES_128, AES_256},
    rsa::{
        OaepPrivateDecryptingKey, OaepPublicEncryptingKey, PrivateDecryptingKey,
        PublicEncryptingKey, OAEP_SHA1_MGF1SHA1,
    },
};
use zeroize::Zeroizing;

use crate::algorithm::{BlockEncryptionAlgorithm, KeyEncryptionAlgorithm};
use crate::error::{CryptoError, CryptoResult};
use crate::random::random_bytes;

const KEY_WRAP_OVERHEAD: usize = 8;
const GCM_TAG_LEN: usize = 16;

/// Encrypts `plaintext` with a fresh random IV.
///
/// # Errors
///
/// Returns [`CryptoError::KeyMismatch`] if `key` has the wrong length for
/// the algorithm.
pub fn encrypt_block(
    algorithm: BlockEncryptionAlgorithm,
    key: &[u8],
    plaintext: &[u8],
) -> CryptoResult<Vec<u8>> {
    let key = aead_key(algorithm, key)?;

    let iv = random_bytes(NONCE_LEN);
    let nonce = Nonce::try_assume_unique_for_key(&iv)
        .map_err(|e| CryptoError::Encryption(format!("bad IV: {e}")))?;

    let mut in_out = plaintext.to_vec();
    key.seal_in_place_append_tag(nonce, Aad::empty(), &mut in_out)
        .map_err(|e| CryptoError::Encryption(format!("AES-GCM seal failed: {e}")))?;

    let mut output = iv;
    output.extend_from_slice(&in_out);
    Ok(output)
}

/// Decrypts an IV-prefixed AES-GCM cipher value.
///
/// The plaintext is returned in a buffer that is wiped on drop, since
/// decrypted keys pass through here as well as document content.
///
/// # Errors
///
/// Returns [`CryptoError::Decryption`] if authentication fails or the input
/// is truncated.
pub fn decrypt_block(
    algorithm: BlockEncryptionAlgorithm,
    key: &[u8],
    cipher_value: &[u8],
) -> CryptoResult<Zeroizing<Vec<u8>>> {
    let key = aead_key(algorithm, key)?;

    if cipher_value.len() < NONCE_LEN + GCM_TAG_LEN {
        return Err(CryptoError::Decryption);
    }
    let (iv, ciphertext) = cipher_value.split_at(NONCE_LEN);
    let nonce = Nonce::try_assume_unique_for_key(iv).map_err(|_| CryptoError::Decryption)?;

    let mut in_out = Zeroizing::new(ciphertext.to_vec());
    let plaintext_len = key
        .open_in_place(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| CryptoError::Decryption)?
        .len();
    in_out.truncate(plaintext_len);
    Ok(in_out)
}

/// Encrypts a data encryption key under a key encryption key.
///
/// For RSA-OAEP `kek` is a DER `SubjectPublicKeyInfo`; for key wrap it is the
/// raw AES key.
///
/// # Errors
///
/// Returns an error if the key encryption key is unusable for `algorithm`.
pub fn encrypt_key(
    algorithm: KeyEncryptionAlgorithm,
    kek: &[u8],
    key: &[u8],
) -> CryptoResult<Vec<u8>> {
    match algorithm {
        KeyEncryptionAlgorithm::RsaOaepMgf1p => {
            let public = PublicEncryptingKey::from_der(kek)
                .map_err(|e| CryptoError::InvalidKey(format!("invalid RSA public key: {e}")))?;
            let oaep = OaepPublicEncryptingKey::new(public)
                .map_err(|e| CryptoError::InvalidKey(format!("RSA key unusable for OAEP: {e}")))?;
            let mut output = vec![0u8; oaep.ciphertext_size()];
            let len = oaep
                .encrypt(&OAEP_SHA1_MGF1SHA1, key, &mut output, None)
                .map_err(|e| CryptoError::Encryption(format!("RSA-OAEP failed: {e}")))?
                .len();
            output.truncate(len);
            Ok(output)
        }
        KeyEncryptionAlgorithm::KwAes128 | KeyEncryptionAlgorithm::KwAes256 => {
            let kek = aes_kek(algorithm, kek)?;
            let mut output = vec![0u8; key.len() + KEY_WRAP_OVERHEAD];
            let len = kek
                .wrap(key, &mut output)
                .map_err(|e| CryptoError::Encryption(format!("AES key wrap failed: {e}")))?
                .len();
            output.truncate(len);
            Ok(output)
        }
    }
}

/// Recovers a data encryption key.
///
/// For RSA-OAEP `kek` is a PKCS#8 DER private key; for key wrap it is the raw
/// AES key.
///
/// # Errors
///
/// Returns [`CryptoError::Decryption`] if unwrapping fails, or a key error if
/// `kek` is unusable.
pub fn decrypt_key(
    algorithm: KeyEncryptionAlgorithm,
    kek: &[u8],
    encrypted_key: &[u8],
) -> CryptoResult<Zeroizing<Vec<u8>>> {
    match algorithm {
        KeyEncryptionAlgorithm::RsaOaepMgf1p => {
            let private = PrivateDecryptingKey::from_pkcs8(kek)
                .map_err(|e| CryptoError::InvalidKey(format!("invalid RSA private key: {e}")))?;
            let oaep = OaepPrivateDecryptingKey::new(private)
                .map_err(|e| CryptoError::InvalidKey(format!("RSA key unusable for OAEP: {e}")))?;
            let mut output = Zeroizing::new(vec![0u8; oaep.min_output_size()]);
            let len = oaep
                .decrypt(&OAEP_SHA1_MGF1SHA1, encrypted_key, &mut output, None)
                .map_err(|_| CryptoError::Decryption)?
                .len();
            output.truncate(len);
            Ok(output)
        }
        KeyEncryptionAlgorithm::KwAes128 | KeyEncryptionAlgorithm::KwAes256 => {
            if encrypted_key.len() <= KEY_WRAP_OVERHEAD {
                return Err(CryptoError::Decryption);
            }
            let kek = aes_kek(algorithm, kek)?;
            let mut output = Zeroizing::new(vec![0u8; encrypted_key.len() - KEY_WRAP_OVERHEAD]);
            let len = kek
                .unwrap(encrypted_key, &mut output)
                .map_err(|_| CryptoError::Decryption)?
                .len();
            output.truncate(len);
            Ok(output)
        }
    }
}

fn aead_key(algorithm: BlockEncryptionAlgorithm, key: &[u8]) -> CryptoResult<LessSafeKey> {
    if key.len() != algorithm.key_len() {
        return Err(CryptoError::KeyMismatch(format!(
            "{} needs a {}-byte key, got {}",
            algorithm.uri(),
            algorithm.key_len(),
            key.len()
        )));
    }
    let aead_alg = match algorithm {
        BlockEncryptionAlgorithm::Aes128Gcm => &AES_128_GCM,
        BlockEncryptionAlgorithm::Aes256Gcm => &AES_256_GCM,
    };
    let unbound = UnboundKey::new(aead_alg, key)
        .map_err(|e| CryptoError::InvalidKey(format!("AES key rejected: {e}")))?;
    Ok(LessSafeKey::new(unbound))
}

fn aes_kek(algorithm: KeyEncryptionAlgorithm, kek: &[u8]) -> CryptoResult<AesKek> {
    let expected = algorithm.kek_len().unwrap_or_default();
    if kek.len() != expected {
        return Err(CryptoError::KeyMismatch(format!(
            "{} needs a {expected}-byte key encryption key, got {}",
            algorithm.uri(),
            kek.len()
        )));
    }
    let cipher = match algorithm {
        KeyEncryptionAlgorithm::KwAes128 => &AES_128,
        _ => &AES_256,
    };
    AesKek::new(cipher, kek).map_err(|e| CryptoError::InvalidKey(format!("AES KEK rejected: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::RsaKeyTransportPair;

    #[test]
    fn gcm_round_trip_layout() {
        let key = [1u8; 32];
        let plaintext = b"<saml:Assertion ID=\"_a1\"/>";

        let cipher_value = encrypt_block(BlockEncryptionAlgorithm::Aes256Gcm, &key, plaintext).unwrap();
        assert_eq!(cipher_value.len(), NONCE_LEN + plaintext.len() + GCM_TAG_LEN);

        let decrypted = decrypt_block(BlockEncryptionAlgorithm::Aes256Gcm, &key, &cipher_value).unwrap();
        assert_eq!(decrypted.as_slice(), plaintext);
    }

    #[test]
    fn gcm_rejects_tampering_and_wrong_key() {
        let key = [2u8; 16];
        let mut cipher_value = encrypt_block(BlockEncryptionAlgorithm::Aes128Gcm, &key, b"secret").unwrap();

        let wrong = decrypt_block(BlockEncryptionAlgorithm::Aes128Gcm, &[3u8; 16], &cipher_value);
        assert!(matches!(wrong, Err(CryptoError::Decryption)));

        let last = cipher_value.len() - 1;
        cipher_value[last] ^= 0x01;
        let tampered = decrypt_block(BlockEncryptionAlgorithm::Aes128Gcm, &key, &cipher_value);
        assert!(matches!(tampered, Err(CryptoError::Decryption)));

        let truncated = decrypt_block(BlockEncryptionAlgorithm::Aes128Gcm, &key, &[0u8; 10]);
        assert!(matches!(truncated, Err(CryptoError::Decryption)));
    }

    #[test]
    fn gcm_key_length_is_checked() {
        let err = encrypt_block(BlockEncryptionAlgorithm::Aes256Gcm, &[0u8; 16], b"x").unwrap_err();
        assert!(matches!(err, CryptoError::KeyMismatch(_)));
    }

    #[test]
    fn key_wrap_round_trip() {
        let kek = [9u8; 16];
        let key = [4u8; 32];

        let wrapped = encrypt_key(KeyEncryptionAlgorithm::KwAes128, &kek, &key).unwrap();
        assert_eq!(wrapped.len(), 40);

        let unwrapped = decrypt_key(KeyEncryptionAlgorithm::KwAes128, &kek, &wrapped).unwrap();
        assert_eq!(unwrapped.as_slice(), &key);

        let wrong = decrypt_key(KeyEncryptionAlgorithm::KwAes128, &[8u8; 16], &wrapped);
        assert!(matches!(wrong, Err(CryptoError::Decryption)));
    }

    #[test]
    fn rsa_oaep_round_trip() {
        let pair = RsaKeyTransportPair::generate().unwrap();
        let key = [5u8; 16];

        let encrypted =
            encrypt_key(KeyEncryptionAlgorithm::RsaOaepMgf1p, pair.public_key_spki(), &key).unwrap();
        assert_eq!(encrypted.len(), 256);

        let decrypted =
            decrypt_key(KeyEncryptionAlgorithm::RsaOaepMgf1p, pair.private_key_pkcs8(), &encrypted)
                .unwrap();
        assert_eq!(decrypted.as_slice(), &key);
    }
}
