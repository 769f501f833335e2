// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Low-level AES-256-GCM seal/open operations.
//!
//! Every call to [`seal`] generates a fresh random 96-bit nonce via the system
//! CSPRNG. The sealed form is `nonce || ciphertext || tag`.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use ring::aead::{AES_256_GCM, Aad, LessSafeKey, NONCE_LEN, Nonce, UnboundKey};
use ring::rand::{SecureRandom, SystemRandom};
use vigil_core::VigilError;
use zeroize::Zeroizing;

fn key(key: &[u8; 32]) -> Result<LessSafeKey, VigilError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key)
        .map_err(|_| VigilError::Internal("failed to create AES-256-GCM key".to_string()))?;
    Ok(LessSafeKey::new(unbound))
}

/// Encrypt `plaintext`, authenticating `aad` alongside it.
pub fn seal(key_bytes: &[u8; 32], plaintext: &[u8], aad: &[u8]) -> Result<Vec<u8>, VigilError> {
    let less_safe = key(key_bytes).map_err(|e| VigilError::EncryptionFailed(e.to_string()))?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    SystemRandom::new()
        .fill(&mut nonce_bytes)
        .map_err(|_| VigilError::EncryptionFailed("failed to generate random nonce".to_string()))?;

    let mut in_out = plaintext.to_vec();
    less_safe
        .seal_in_place_append_tag(
            Nonce::assume_unique_for_key(nonce_bytes),
            Aad::from(aad),
            &mut in_out,
        )
        .map_err(|_| VigilError::EncryptionFailed("AES-256-GCM seal failed".to_string()))?;

    let mut sealed = Vec::with_capacity(NONCE_LEN + in_out.len());
    sealed.extend_from_slice(&nonce_bytes);
    sealed.extend_from_slice(&in_out);
    Ok(sealed)
}

/// Decrypt a value produced by [`seal`] with the same `aad`.
///
/// Fails on a wrong key, mismatched `aad`, truncation, or any tampering.
pub fn open(key_bytes: &[u8; 32], sealed: &[u8], aad: &[u8]) -> Result<Zeroizing<Vec<u8>>, VigilError> {
    let less_safe = key(key_bytes).map_err(|e| VigilError::DecryptionFailed(e.to_string()))?;

    if sealed.len() < NONCE_LEN + AES_256_GCM.tag_len() {
        return Err(VigilError::DecryptionFailed("ciphertext is truncated".to_string()));
    }
    let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_LEN);
    let nonce = Nonce::try_assume_unique_for_key(nonce_bytes)
        .map_err(|_| VigilError::DecryptionFailed("malformed nonce".to_string()))?;

    let mut in_out = Zeroizing::new(ciphertext.to_vec());
    let plaintext_len = less_safe
        .open_in_place(nonce, Aad::from(aad), &mut in_out)
        .map_err(|_| {
            VigilError::DecryptionFailed("wrong key or corrupted ciphertext".to_string())
        })?
        .len();
    in_out.truncate(plaintext_len);
    Ok(in_out)
}

/// [`seal`] and encode the result as standard base64.
pub fn seal_to_base64(key_bytes: &[u8; 32], plaintext: &[u8], aad: &[u8]) -> Result<String, VigilError> {
    seal(key_bytes, plaintext, aad).map(|sealed| STANDARD.encode(sealed))
}

/// Decode standard base64 and [`open`] the result.
pub fn open_from_base64(
    key_bytes: &[u8; 32],
    encoded: &str,
    aad: &[u8],
) -> Result<Zeroizing<Vec<u8>>, VigilError> {
    let sealed = STANDARD
        .decode(encoded)
        .map_err(|_| VigilError::DecryptionFailed("ciphertext is not valid base64".to_string()))?;
    open(key_bytes, &sealed, aad)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn random_key() -> [u8; 32] {
        let mut key = [0u8; 32];
        SystemRandom::new().fill(&mut key).unwrap();
        key
    }

    #[test]
    fn seal_open_roundtrip() {
        let key = random_key();
        let sealed = seal(&key, b"secret api key value", b"id-1").unwrap();
        let opened = open(&key, &sealed, b"id-1").unwrap();
        assert_eq!(opened.as_slice(), b"secret api key value");
    }

    #[test]
    fn sealing_twice_gives_different_output() {
        let key = random_key();
        let a = seal(&key, b"same input twice", b"").unwrap();
        let b = seal(&key, b"same input twice", b"").unwrap();
        assert_ne!(a[..NONCE_LEN], b[..NONCE_LEN]);
        assert_ne!(a, b);
    }

    #[test]
    fn sealed_length_is_nonce_plus_plaintext_plus_tag() {
        let key = random_key();
        let sealed = seal(&key, b"hello", b"").unwrap();
        assert_eq!(sealed.len(), NONCE_LEN + 5 + 16);
    }

    #[test]
    fn wrong_key_fails() {
        let sealed = seal(&random_key(), b"secret", b"").unwrap();
        assert!(matches!(
            open(&random_key(), &sealed, b""),
            Err(VigilError::DecryptionFailed(_))
        ));
    }

    #[test]
    fn mismatched_aad_fails() {
        let key = random_key();
        let sealed = seal(&key, b"secret", b"record-a").unwrap();
        assert!(open(&key, &sealed, b"record-b").is_err());
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let key = random_key();
        let mut sealed = seal(&key, b"do not tamper", b"").unwrap();
        sealed[NONCE_LEN] ^= 0x01;
        assert!(open(&key, &sealed, b"").is_err());
    }

    #[test]
    fn truncated_input_fails_without_panicking() {
        let key = random_key();
        assert!(matches!(
            open(&key, &[0u8; 10], b""),
            Err(VigilError::DecryptionFailed(_))
        ));
    }

    #[test]
    fn base64_helpers_roundtrip_and_reject_garbage() {
        let key = random_key();
        let encoded = seal_to_base64(&key, b"p@ss", b"x").unwrap();
        assert_eq!(open_from_base64(&key, &encoded, b"x").unwrap().as_slice(), b"p@ss");
        assert!(matches!(
            open_from_base64(&key, "not base64!!", b"x"),
            Err(VigilError::DecryptionFailed(_))
        ));
    }
}
