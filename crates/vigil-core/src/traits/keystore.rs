// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secure keystore trait for host-provided secret storage (platform keychain, etc.).

use crate::error::VigilError;

/// Durable secret storage scoped by an opaque service identifier.
///
/// Implementations decide the scoping; callers only see flat keys.
pub trait SecureKeystore: Send + Sync {
    /// Stores `value` under `key`, replacing any previous value.
    fn save(&self, key: &str, value: &[u8]) -> Result<(), VigilError>;

    /// Loads the value under `key`, or `None` if nothing is stored.
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, VigilError>;

    /// Deletes the value under `key`. Deleting a missing key succeeds.
    fn delete(&self, key: &str) -> Result<(), VigilError>;
}
