// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persisted vault records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vigil_core::VigilError;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// One stored credential. Only `ciphertext` is secret, and it is sealed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Stable identifier, also bound to the ciphertext as associated data.
    pub id: String,
    pub service: String,
    pub username: String,
    /// Base64 of `nonce || ciphertext || tag`.
    pub ciphertext: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// PBKDF2 output for the master password, with the salt and work factor that
/// produced it. Always persisted as a single keystore entry.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct MasterSecretRecord {
    pub derived_key: Vec<u8>,
    pub salt: Vec<u8>,
    pub iterations: u32,
}

impl std::fmt::Debug for MasterSecretRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasterSecretRecord")
            .field("derived_key", &"[REDACTED]")
            .field("salt_len", &self.salt.len())
            .field("iterations", &self.iterations)
            .finish()
    }
}

/// On-keystore JSON shape.
#[derive(Serialize, Deserialize)]
struct StoredMasterSecret {
    derived_key: String,
    salt: String,
    iterations: u32,
}

impl MasterSecretRecord {
    /// Serialize to the keystore representation.
    pub fn to_bytes(&self) -> Result<Vec<u8>, VigilError> {
        let mut stored = StoredMasterSecret {
            derived_key: hex::encode(&self.derived_key),
            salt: hex::encode(&self.salt),
            iterations: self.iterations,
        };
        let bytes = serde_json::to_vec(&stored).map_err(VigilError::storage);
        stored.derived_key.zeroize();
        bytes
    }

    /// Parse the keystore representation.
    ///
    /// A record missing either half, or with an empty salt, is rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, VigilError> {
        let mut stored: StoredMasterSecret =
            serde_json::from_slice(bytes).map_err(VigilError::storage)?;
        let derived_key = hex::decode(&stored.derived_key)
            .map_err(|e| VigilError::Keystore(format!("corrupted master secret: {e}")));
        stored.derived_key.zeroize();
        let derived_key = derived_key?;
        let salt = hex::decode(&stored.salt)
            .map_err(|e| VigilError::Keystore(format!("corrupted master salt: {e}")))?;

        if derived_key.is_empty() {
            return Err(VigilError::Keystore("master secret has no derived key".to_string()));
        }
        if salt.is_empty() {
            return Err(VigilError::EncryptionSaltMissing);
        }

        Ok(Self {
            derived_key,
            salt,
            iterations: stored.iterations,
        })
    }
}
