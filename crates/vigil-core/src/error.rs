// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Vigil workspace.

use thiserror::Error;

/// The primary error type used across all Vigil crates and collaborator traits.
#[derive(Debug, Error)]
pub enum VigilError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Durable storage errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The secure keystore rejected a save, load, or delete.
    #[error("keystore error: {0}")]
    Keystore(String),

    /// An encryption or decryption key was requested before any master secret exists.
    #[error("master password is not set")]
    MasterPasswordNotSet,

    /// A master secret exists but the per-vault encryption salt is gone.
    #[error("encryption salt is missing from vault storage")]
    EncryptionSaltMissing,

    /// The authenticated-encryption primitive refused to seal a value.
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    /// The authenticated-encryption primitive refused to open a value
    /// (wrong or rotated key, corrupted or tampered ciphertext).
    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    /// A mutation or lookup targeted a credential id that does not exist.
    #[error("credential not found: {id}")]
    NotFound { id: String },

    /// The vault has a master secret but it has not been verified this session.
    #[error("vault is locked")]
    VaultLocked,

    /// Caller-supplied input was rejected before any work was done.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The remote classifier produced no usable verdict.
    #[error("remote classifier unavailable: {message}")]
    RemoteUnavailable {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl VigilError {
    /// Wraps any error as a storage failure.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        VigilError::Storage {
            source: Box::new(err),
        }
    }

    /// Builds a `RemoteUnavailable` without an underlying cause.
    pub fn remote(message: impl Into<String>) -> Self {
        VigilError::RemoteUnavailable {
            message: message.into(),
            source: None,
        }
    }
}
