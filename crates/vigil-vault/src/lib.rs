// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Master-password protected credential vault for Vigil.
//!
//! The master password is never stored. Only a PBKDF2-HMAC-SHA256 derived key
//! and its salt are kept in the secure keystore. Credential passwords are
//! sealed with AES-256-GCM under a key expanded from that derived key via
//! HKDF-SHA256 and a separate per-vault encryption salt.
//!
//! Setting a new master password without a reset orphans every existing
//! ciphertext. There is no re-encryption path.

pub mod crypto;
pub mod generator;
pub mod kdf;
pub mod prompt;
pub mod record;
pub mod vault;

pub use generator::{PasswordPolicy, generate_password};
pub use prompt::{
    get_master_password, get_master_password_with_confirm, prompt_secret, read_secret_line,
};
pub use record::{CredentialRecord, MasterSecretRecord};
pub use vault::{LockState, UNDECRYPTABLE_PLACEHOLDER, Vault, mask_secret};
