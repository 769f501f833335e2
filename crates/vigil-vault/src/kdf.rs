// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key derivation: PBKDF2 for the master password, HKDF for the encryption key.
//!
//! The PBKDF2 output is never used as an AEAD key directly.

use std::num::NonZeroU32;

use ring::rand::{SecureRandom, SystemRandom};
use ring::{hkdf, pbkdf2};
use vigil_core::VigilError;
use zeroize::Zeroizing;

/// Length of both the master-derived key and the encryption key.
pub const KEY_LEN: usize = 32;

/// HKDF info label binding expanded keys to credential encryption.
const ENCRYPTION_KEY_INFO: &[u8] = b"vigil:vault:credential-key:v1";

static PBKDF2_ALG: pbkdf2::Algorithm = pbkdf2::PBKDF2_HMAC_SHA256;

/// Generate `len` random bytes from the system CSPRNG.
pub fn generate_salt(len: usize) -> Result<Vec<u8>, VigilError> {
    let rng = SystemRandom::new();
    let mut salt = vec![0u8; len];
    rng.fill(&mut salt)
        .map_err(|_| VigilError::Internal("failed to generate random salt".to_string()))?;
    Ok(salt)
}

fn iterations(count: u32) -> Result<NonZeroU32, VigilError> {
    NonZeroU32::new(count)
        .ok_or_else(|| VigilError::InvalidInput("KDF iteration count must be non-zero".to_string()))
}

/// Derive a 32-byte key from `password` with PBKDF2-HMAC-SHA256.
pub fn derive_master_key(
    password: &[u8],
    salt: &[u8],
    iteration_count: u32,
) -> Result<Zeroizing<[u8; KEY_LEN]>, VigilError> {
    let mut out = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::derive(PBKDF2_ALG, iterations(iteration_count)?, salt, password, out.as_mut());
    Ok(out)
}

/// Re-derive from `password` and compare against `expected` in constant time.
///
/// Returns false for a zero iteration count instead of erroring.
pub fn verify_master_key(password: &[u8], salt: &[u8], iteration_count: u32, expected: &[u8]) -> bool {
    let Ok(iterations) = iterations(iteration_count) else {
        return false;
    };
    pbkdf2::verify(PBKDF2_ALG, iterations, salt, password, expected).is_ok()
}

/// Expand the master-derived key into the AES-256-GCM credential key.
pub fn derive_encryption_key(
    master_key: &[u8],
    encryption_salt: &[u8],
) -> Result<Zeroizing<[u8; KEY_LEN]>, VigilError> {
    let prk = hkdf::Salt::new(hkdf::HKDF_SHA256, encryption_salt).extract(master_key);
    let info = [ENCRYPTION_KEY_INFO];
    let okm = prk
        .expand(&info, hkdf::HKDF_SHA256)
        .map_err(|_| VigilError::Internal("HKDF expansion failed".to_string()))?;

    let mut out = Zeroizing::new([0u8; KEY_LEN]);
    okm.fill(out.as_mut())
        .map_err(|_| VigilError::Internal("HKDF output fill failed".to_string()))?;
    Ok(out)
}
