// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Random password generation from the system CSPRNG.

use ring::rand::{SecureRandom, SystemRandom};
use secrecy::SecretString;
use vigil_core::VigilError;
use zeroize::Zeroizing;

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*()-_=+[]{};:,.<>?/";

/// Upper bound on generated length.
pub const MAX_LENGTH: usize = 1024;

/// Which character classes to draw from, and how many characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub length: usize,
    pub lowercase: bool,
    pub uppercase: bool,
    pub digits: bool,
    pub symbols: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            length: 16,
            lowercase: true,
            uppercase: true,
            digits: true,
            symbols: true,
        }
    }
}

impl PasswordPolicy {
    fn classes(&self) -> Vec<&'static [u8]> {
        [
            (self.lowercase, LOWERCASE),
            (self.uppercase, UPPERCASE),
            (self.digits, DIGITS),
            (self.symbols, SYMBOLS),
        ]
        .into_iter()
        .filter_map(|(enabled, set)| enabled.then_some(set))
        .collect()
    }
}

/// Uniform index in `0..n` by rejection sampling, so no class is favoured.
fn uniform_index(rng: &SystemRandom, n: usize) -> Result<usize, VigilError> {
    let n = u32::try_from(n).map_err(|_| VigilError::InvalidInput("range too large".to_string()))?;
    if n == 0 {
        return Err(VigilError::InvalidInput("empty range".to_string()));
    }
    let limit = u32::MAX - (u32::MAX % n);
    loop {
        let mut buf = [0u8; 4];
        rng.fill(&mut buf)
            .map_err(|_| VigilError::Internal("system random source failed".to_string()))?;
        let value = u32::from_le_bytes(buf);
        if value < limit {
            return Ok((value % n) as usize);
        }
    }
}

/// Generate a password satisfying `policy`.
///
/// Every enabled class contributes at least one character. Fails with
/// `InvalidInput` when no class is enabled, or when `length` is zero, above
/// [`MAX_LENGTH`], or shorter than the number of enabled classes.
pub fn generate_password(policy: &PasswordPolicy) -> Result<SecretString, VigilError> {
    let classes = policy.classes();
    if classes.is_empty() {
        return Err(VigilError::InvalidInput(
            "at least one character class must be enabled".to_string(),
        ));
    }
    if policy.length == 0 || policy.length > MAX_LENGTH {
        return Err(VigilError::InvalidInput(format!(
            "password length must be between 1 and {MAX_LENGTH}"
        )));
    }
    if policy.length < classes.len() {
        return Err(VigilError::InvalidInput(format!(
            "password length {} is shorter than the {} enabled character classes",
            policy.length,
            classes.len()
        )));
    }

    let rng = SystemRandom::new();
    let alphabet: Vec<u8> = classes.iter().flat_map(|c| c.iter().copied()).collect();
    let mut out = Zeroizing::new(Vec::with_capacity(policy.length));

    for class in &classes {
        out.push(class[uniform_index(&rng, class.len())?]);
    }
    while out.len() < policy.length {
        out.push(alphabet[uniform_index(&rng, alphabet.len())?]);
    }

    // Fisher-Yates, so the guaranteed characters are not always in front.
    for i in (1..out.len()).rev() {
        let j = uniform_index(&rng, i + 1)?;
        out.swap(i, j);
    }

    let password = out.iter().map(|&b| b as char).collect::<String>();
    Ok(SecretString::from(password))
}
