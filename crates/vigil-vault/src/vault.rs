// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault lifecycle: master password, lock state, and credential CRUD.
//!
//! Persisted state:
//! - keystore `master_secret`: PBKDF2 derived key, its salt, iteration count.
//! - record store `encryption_salt`: HKDF salt for the credential key.
//! - record store `credentials`: JSON array of [`CredentialRecord`].
//!
//! Every public operation holds the vault mutex for its whole duration, so
//! read-modify-write of the credential list is serialized per instance.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};
use vigil_config::model::VaultConfig;
use vigil_core::{RecordStore, SecureKeystore, VigilError};
use zeroize::Zeroizing;

use crate::crypto;
use crate::kdf::{self, KEY_LEN};
use crate::record::{CredentialRecord, MasterSecretRecord};

/// Keystore entry holding the [`MasterSecretRecord`].
pub const MASTER_SECRET_KEY: &str = "master_secret";
/// Record-store blob holding the HKDF salt.
pub const ENCRYPTION_SALT_RECORD: &str = "encryption_salt";
/// Record-store blob holding the serialized credential list.
pub const CREDENTIALS_RECORD: &str = "credentials";

/// Shown in place of a password that cannot be decrypted.
pub const UNDECRYPTABLE_PLACEHOLDER: &str = "[unable to decrypt]";

/// Per-instance lock state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    /// No master secret exists.
    Uninitialized,
    /// A master secret exists but has not been verified this session.
    Locked,
    /// Verified this session; credential operations are permitted.
    Unlocked,
}

impl LockState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LockState::Uninitialized => "uninitialized",
            LockState::Locked => "locked",
            LockState::Unlocked => "unlocked",
        }
    }
}

impl std::fmt::Display for LockState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which failure a missing master secret is reported as.
#[derive(Clone, Copy)]
enum Purpose {
    Encrypt,
    Decrypt,
    Mutate,
}

impl Purpose {
    fn wrap(self, err: VigilError) -> VigilError {
        match (self, err) {
            (_, VigilError::VaultLocked) => VigilError::VaultLocked,
            (Purpose::Encrypt, e @ VigilError::EncryptionFailed(_)) => e,
            (Purpose::Decrypt, e @ VigilError::DecryptionFailed(_)) => e,
            (Purpose::Encrypt, e) => VigilError::EncryptionFailed(e.to_string()),
            (Purpose::Decrypt, e) => VigilError::DecryptionFailed(e.to_string()),
            (Purpose::Mutate, e) => e,
        }
    }
}

struct VaultState {
    lock: LockState,
    credentials: Vec<CredentialRecord>,
}

impl VaultState {
    fn require_unlocked(&self, purpose: Purpose) -> Result<(), VigilError> {
        match self.lock {
            LockState::Unlocked => Ok(()),
            LockState::Locked => Err(VigilError::VaultLocked),
            LockState::Uninitialized => Err(purpose.wrap(VigilError::MasterPasswordNotSet)),
        }
    }

    fn position(&self, id: &str) -> Result<usize, VigilError> {
        self.credentials
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| VigilError::NotFound { id: id.to_string() })
    }
}

/// The credential vault engine.
///
/// Debug output omits all key material and credential contents.
pub struct Vault {
    keystore: Arc<dyn SecureKeystore>,
    records: Arc<dyn RecordStore>,
    config: VaultConfig,
    state: Mutex<VaultState>,
}

impl std::fmt::Debug for Vault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("Vault");
        if let Ok(state) = self.state.lock() {
            s.field("state", &state.lock)
                .field("credentials", &state.credentials.len());
        }
        s.finish_non_exhaustive()
    }
}

impl Vault {
    /// Open a vault over the given collaborators.
    ///
    /// Starts `Locked` when a master secret exists, otherwise `Uninitialized`.
    pub fn open(
        keystore: Arc<dyn SecureKeystore>,
        records: Arc<dyn RecordStore>,
        config: VaultConfig,
    ) -> Result<Self, VigilError> {
        let lock = if keystore.load(MASTER_SECRET_KEY)?.is_some() {
            LockState::Locked
        } else {
            LockState::Uninitialized
        };
        let credentials = load_credentials(records.as_ref())?;

        debug!(state = %lock, credentials = credentials.len(), "vault opened");
        Ok(Self {
            keystore,
            records,
            config,
            state: Mutex::new(VaultState { lock, credentials }),
        })
    }

    fn guard(&self) -> Result<MutexGuard<'_, VaultState>, VigilError> {
        self.state
            .lock()
            .map_err(|_| VigilError::Internal("vault mutex poisoned".to_string()))
    }

    /// Current lock state.
    pub fn state(&self) -> LockState {
        self.guard()
            .map(|s| s.lock)
            .unwrap_or(LockState::Locked)
    }

    /// True iff a master secret currently exists in the keystore.
    pub fn has_master_password(&self) -> bool {
        match self.keystore.load(MASTER_SECRET_KEY) {
            Ok(entry) => entry.is_some(),
            Err(e) => {
                warn!(error = %e, "failed to read master secret");
                false
            }
        }
    }

    /// Derive and store a new master secret, replacing any previous one.
    ///
    /// Also regenerates the encryption salt and unlocks the vault. Existing
    /// credentials are kept but can no longer be decrypted. Returns false on
    /// any failure, including an empty password.
    pub fn set_master_password(&self, password: &str) -> bool {
        match self.try_set_master_password(password) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "failed to set master password");
                false
            }
        }
    }

    fn try_set_master_password(&self, password: &str) -> Result<(), VigilError> {
        if password.is_empty() {
            return Err(VigilError::InvalidInput("master password must not be empty".to_string()));
        }

        let mut state = self.guard()?;
        let salt = kdf::generate_salt(self.config.salt_len)?;
        let derived = kdf::derive_master_key(password.as_bytes(), &salt, self.config.kdf_iterations)?;
        let record = MasterSecretRecord {
            derived_key: derived.to_vec(),
            salt,
            iterations: self.config.kdf_iterations,
        };
        let encryption_salt = kdf::generate_salt(self.config.salt_len)?;

        let bytes = Zeroizing::new(record.to_bytes()?);
        let previous = self.snapshot()?;

        let written = self
            .keystore
            .save(MASTER_SECRET_KEY, &bytes)
            .and_then(|()| self.records.put(ENCRYPTION_SALT_RECORD, &encryption_salt));
        if let Err(e) = written {
            self.restore(&previous);
            return Err(e);
        }

        state.lock = LockState::Unlocked;
        info!(iterations = self.config.kdf_iterations, "master password set");
        Ok(())
    }

    /// Check `password` against the stored master secret in constant time.
    ///
    /// Success unlocks the vault. Failure leaves the state unchanged and
    /// reveals nothing about why.
    pub fn verify_master_password(&self, password: &str) -> bool {
        let Ok(mut state) = self.guard() else {
            return false;
        };
        let record = match self.load_master_secret() {
            Ok(Some(record)) => record,
            Ok(None) => return false,
            Err(e) => {
                warn!(error = %e, "failed to read master secret");
                return false;
            }
        };

        let matches = kdf::verify_master_key(
            password.as_bytes(),
            &record.salt,
            record.iterations,
            &record.derived_key,
        );
        if matches {
            state.lock = LockState::Unlocked;
            debug!("vault unlocked");
        }
        matches
    }

    /// Delete the master secret, the encryption salt, and every credential.
    ///
    /// Irreversible. Callers are responsible for confirmation.
    ///
    /// On a storage failure every persisted item is restored and the vault
    /// keeps its previous state.
    pub fn reset_master_password(&self) -> Result<(), VigilError> {
        let mut state = self.guard()?;
        let previous = self.snapshot()?;

        // Credentials go first so a partial reset never leaves records
        // without the secret that decrypts them.
        let removed = self
            .records
            .remove(CREDENTIALS_RECORD)
            .and_then(|()| self.records.remove(ENCRYPTION_SALT_RECORD))
            .and_then(|()| self.keystore.delete(MASTER_SECRET_KEY));
        if let Err(e) = removed {
            self.restore(&previous);
            return Err(e);
        }

        let discarded = state.credentials.len();
        state.credentials.clear();
        state.lock = LockState::Uninitialized;
        warn!(discarded, "vault reset; all credentials discarded");
        Ok(())
    }

    /// Relock an unlocked vault. No-op in any other state.
    pub fn lock(&self) {
        if let Ok(mut state) = self.guard()
            && state.lock == LockState::Unlocked
        {
            state.lock = LockState::Locked;
            debug!("vault locked");
        }
    }

    /// Snapshot of all credential records (no secrets are decrypted).
    pub fn credentials(&self) -> Result<Vec<CredentialRecord>, VigilError> {
        Ok(self.guard()?.credentials.clone())
    }

    /// Look up a credential record by id.
    pub fn get_credential(&self, id: &str) -> Result<CredentialRecord, VigilError> {
        let state = self.guard()?;
        let idx = state.position(id)?;
        Ok(state.credentials[idx].clone())
    }

    /// Encrypt `password` and append a new credential.
    ///
    /// Fails with `EncryptionFailed` when no master secret is set, and with
    /// `VaultLocked` when the vault has not been unlocked.
    pub fn add_credential(
        &self,
        service: &str,
        username: &str,
        password: &str,
        notes: Option<&str>,
    ) -> Result<CredentialRecord, VigilError> {
        let mut state = self.guard()?;
        state.require_unlocked(Purpose::Encrypt)?;
        let key = self.encryption_key().map_err(|e| Purpose::Encrypt.wrap(e))?;

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();
        let record = CredentialRecord {
            ciphertext: crypto::seal_to_base64(&key, password.as_bytes(), id.as_bytes())?,
            id,
            service: service.to_string(),
            username: username.to_string(),
            notes: notes.map(str::to_string),
            created_at: now,
            updated_at: now,
        };

        let mut next = state.credentials.clone();
        next.push(record.clone());
        self.persist(&next)?;
        state.credentials = next;

        debug!(id = %record.id, service = %record.service, "credential added");
        Ok(record)
    }

    /// Re-encrypt and replace the credential with `id`, keeping its id and
    /// creation time.
    pub fn update_credential(
        &self,
        id: &str,
        service: &str,
        username: &str,
        password: &str,
        notes: Option<&str>,
    ) -> Result<CredentialRecord, VigilError> {
        let mut state = self.guard()?;
        state.require_unlocked(Purpose::Encrypt)?;
        let idx = state.position(id)?;
        let key = self.encryption_key().map_err(|e| Purpose::Encrypt.wrap(e))?;

        let previous = &state.credentials[idx];
        let record = CredentialRecord {
            id: previous.id.clone(),
            service: service.to_string(),
            username: username.to_string(),
            ciphertext: crypto::seal_to_base64(&key, password.as_bytes(), previous.id.as_bytes())?,
            notes: notes.map(str::to_string),
            created_at: previous.created_at,
            updated_at: Utc::now(),
        };

        let mut next = state.credentials.clone();
        next[idx] = record.clone();
        self.persist(&next)?;
        state.credentials = next;

        debug!(id = %id, "credential updated");
        Ok(record)
    }

    /// Remove the credential with `id` and persist the reduced set.
    pub fn delete_credential(&self, id: &str) -> Result<(), VigilError> {
        let mut state = self.guard()?;
        state.require_unlocked(Purpose::Mutate)?;
        let idx = state.position(id)?;

        let mut next = state.credentials.clone();
        next.remove(idx);
        self.persist(&next)?;
        state.credentials = next;

        debug!(id = %id, "credential deleted");
        Ok(())
    }

    /// Decrypt the password held by `record`.
    ///
    /// `record` need not belong to the current set; a record sealed under a
    /// previous master secret fails with `DecryptionFailed`.
    pub fn decrypt_credential(&self, record: &CredentialRecord) -> Result<SecretString, VigilError> {
        let state = self.guard()?;
        state.require_unlocked(Purpose::Decrypt)?;
        let key = self.encryption_key().map_err(|e| Purpose::Decrypt.wrap(e))?;
        open_record(&key, record)
    }

    /// Decrypt the password of the stored credential with `id`.
    pub fn decrypt_credential_by_id(&self, id: &str) -> Result<SecretString, VigilError> {
        let state = self.guard()?;
        state.require_unlocked(Purpose::Decrypt)?;
        let idx = state.position(id)?;
        let key = self.encryption_key().map_err(|e| Purpose::Decrypt.wrap(e))?;
        open_record(&key, &state.credentials[idx])
    }

    /// Decrypt every stored credential independently.
    ///
    /// One failing record does not affect the others.
    pub fn reveal_all(
        &self,
    ) -> Result<Vec<(CredentialRecord, Result<SecretString, VigilError>)>, VigilError> {
        let state = self.guard()?;
        state.require_unlocked(Purpose::Decrypt)?;
        let key = self.encryption_key();

        Ok(state
            .credentials
            .iter()
            .map(|record| {
                let secret = match &key {
                    Ok(key) => open_record(key, record),
                    Err(e) => Err(VigilError::DecryptionFailed(e.to_string())),
                };
                (record.clone(), secret)
            })
            .collect())
    }

    /// Plaintext password for display, or [`UNDECRYPTABLE_PLACEHOLDER`].
    pub fn display_password(&self, record: &CredentialRecord) -> String {
        match self.decrypt_credential(record) {
            Ok(secret) => secret.expose_secret().to_string(),
            Err(e) => {
                debug!(id = %record.id, error = %e, "credential not decryptable");
                UNDECRYPTABLE_PLACEHOLDER.to_string()
            }
        }
    }

    /// Expand the current master secret into the AES-256-GCM credential key.
    pub(crate) fn encryption_key(&self) -> Result<Zeroizing<[u8; KEY_LEN]>, VigilError> {
        let master = self
            .load_master_secret()?
            .ok_or(VigilError::MasterPasswordNotSet)?;
        let salt = self
            .records
            .get(ENCRYPTION_SALT_RECORD)?
            .filter(|s| !s.is_empty())
            .ok_or(VigilError::EncryptionSaltMissing)?;
        kdf::derive_encryption_key(&master.derived_key, &salt)
    }

    fn load_master_secret(&self) -> Result<Option<MasterSecretRecord>, VigilError> {
        self.keystore
            .load(MASTER_SECRET_KEY)?
            .map(|bytes| MasterSecretRecord::from_bytes(&Zeroizing::new(bytes)))
            .transpose()
    }

    fn snapshot(&self) -> Result<Snapshot, VigilError> {
        Ok(Snapshot {
            master_secret: self.keystore.load(MASTER_SECRET_KEY)?.map(Zeroizing::new),
            encryption_salt: self.records.get(ENCRYPTION_SALT_RECORD)?,
            credentials: self.records.get(CREDENTIALS_RECORD)?,
        })
    }

    /// Best-effort rollback to `snapshot`. Failures are logged, not returned,
    /// so the caller still reports the original error.
    fn restore(&self, snapshot: &Snapshot) {
        let results = [
            match &snapshot.master_secret {
                Some(bytes) => self.keystore.save(MASTER_SECRET_KEY, bytes),
                None => self.keystore.delete(MASTER_SECRET_KEY),
            },
            restore_blob(self.records.as_ref(), ENCRYPTION_SALT_RECORD, &snapshot.encryption_salt),
            restore_blob(self.records.as_ref(), CREDENTIALS_RECORD, &snapshot.credentials),
        ];
        for e in results.into_iter().filter_map(Result::err) {
            warn!(error = %e, "rollback after failed write was incomplete");
        }
    }

    fn persist(&self, credentials: &[CredentialRecord]) -> Result<(), VigilError> {
        let bytes = serde_json::to_vec(credentials).map_err(VigilError::storage)?;
        self.records.put(CREDENTIALS_RECORD, &bytes)
    }
}

/// Persisted vault items as they were before a multi-step write.
struct Snapshot {
    master_secret: Option<Zeroizing<Vec<u8>>>,
    encryption_salt: Option<Vec<u8>>,
    credentials: Option<Vec<u8>>,
}

fn restore_blob(
    records: &dyn RecordStore,
    name: &str,
    blob: &Option<Vec<u8>>,
) -> Result<(), VigilError> {
    match blob {
        Some(bytes) => records.put(name, bytes),
        None => records.remove(name),
    }
}

fn load_credentials(records: &dyn RecordStore) -> Result<Vec<CredentialRecord>, VigilError> {
    match records.get(CREDENTIALS_RECORD)? {
        Some(bytes) => serde_json::from_slice(&bytes).map_err(VigilError::storage),
        None => Ok(Vec::new()),
    }
}

fn open_record(key: &[u8; KEY_LEN], record: &CredentialRecord) -> Result<SecretString, VigilError> {
    let plaintext = crypto::open_from_base64(key, &record.ciphertext, record.id.as_bytes())?;
    let value = std::str::from_utf8(&plaintext)
        .map_err(|_| VigilError::DecryptionFailed("decrypted value is not valid UTF-8".to_string()))?;
    Ok(SecretString::from(value.to_string()))
}

/// Mask a secret for display: `"sk-a...mnop"`.
///
/// Shows up to 4 leading and 4 trailing characters. Values shorter than 10
/// characters are fully masked as `"****"`.
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() < 10 {
        return "****".to_string();
    }
    let prefix: String = chars[..4].iter().collect();
    let suffix: String = chars[chars.len() - 4..].iter().collect();
    format!("{prefix}...{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_storage::{MemoryKeystore, MemoryRecordStore};

    fn test_config() -> VaultConfig {
        VaultConfig {
            kdf_iterations: 1_000,
            ..VaultConfig::default()
        }
    }

    fn memory_vault() -> (Vault, Arc<MemoryKeystore>, Arc<MemoryRecordStore>) {
        let keystore = Arc::new(MemoryKeystore::new());
        let records = Arc::new(MemoryRecordStore::new());
        let vault = Vault::open(keystore.clone(), records.clone(), test_config()).unwrap();
        (vault, keystore, records)
    }

    #[test]
    fn fresh_vault_is_uninitialized() {
        let (vault, _, _) = memory_vault();
        assert_eq!(vault.state(), LockState::Uninitialized);
        assert!(!vault.has_master_password());
        assert!(!vault.verify_master_password("anything"));
        assert!(!vault.verify_master_password(""));
    }

    #[test]
    fn set_master_password_unlocks_and_persists_single_entry() {
        let (vault, keystore, records) = memory_vault();
        assert!(vault.set_master_password("correct horse"));
        assert_eq!(vault.state(), LockState::Unlocked);
        assert_eq!(keystore.len(), 1);
        assert!(records.get(ENCRYPTION_SALT_RECORD).unwrap().is_some());
    }

    #[test]
    fn empty_master_password_is_rejected() {
        let (vault, _, _) = memory_vault();
        assert!(!vault.set_master_password(""));
        assert_eq!(vault.state(), LockState::Uninitialized);
    }

    #[test]
    fn failed_verify_keeps_vault_locked() {
        let (vault, _, _) = memory_vault();
        assert!(vault.set_master_password("pw-one"));
        vault.lock();
        assert_eq!(vault.state(), LockState::Locked);

        assert!(!vault.verify_master_password("pw-two"));
        assert_eq!(vault.state(), LockState::Locked);

        assert!(vault.verify_master_password("pw-one"));
        assert_eq!(vault.state(), LockState::Unlocked);
    }

    #[test]
    fn locked_vault_refuses_credential_operations() {
        let (vault, _, _) = memory_vault();
        assert!(vault.set_master_password("pw"));
        let record = vault.add_credential("mail", "me", "secret", None).unwrap();
        vault.lock();

        assert!(matches!(
            vault.add_credential("x", "y", "z", None),
            Err(VigilError::VaultLocked)
        ));
        assert!(matches!(vault.decrypt_credential(&record), Err(VigilError::VaultLocked)));
        assert!(matches!(vault.delete_credential(&record.id), Err(VigilError::VaultLocked)));
        assert_eq!(vault.display_password(&record), UNDECRYPTABLE_PLACEHOLDER);
    }

    #[test]
    fn add_without_master_password_is_encryption_failure() {
        let (vault, _, _) = memory_vault();
        assert!(matches!(
            vault.add_credential("mail", "me", "secret", None),
            Err(VigilError::EncryptionFailed(_))
        ));
    }

    #[test]
    fn encryption_key_reports_missing_prerequisites() {
        let (vault, _, records) = memory_vault();
        assert!(matches!(vault.encryption_key(), Err(VigilError::MasterPasswordNotSet)));

        assert!(vault.set_master_password("pw"));
        records.remove(ENCRYPTION_SALT_RECORD).unwrap();
        assert!(matches!(vault.encryption_key(), Err(VigilError::EncryptionSaltMissing)));
        assert!(matches!(
            vault.add_credential("mail", "me", "secret", None),
            Err(VigilError::EncryptionFailed(_))
        ));
    }

    #[test]
    fn ciphertext_swapped_between_records_is_rejected() {
        let (vault, _, _) = memory_vault();
        assert!(vault.set_master_password("pw"));
        let a = vault.add_credential("a", "u", "alpha", None).unwrap();
        let b = vault.add_credential("b", "u", "bravo", None).unwrap();

        let forged = CredentialRecord {
            ciphertext: b.ciphertext.clone(),
            ..a.clone()
        };
        assert!(matches!(
            vault.decrypt_credential(&forged),
            Err(VigilError::DecryptionFailed(_))
        ));
    }

    #[test]
    fn update_missing_id_is_not_found() {
        let (vault, _, _) = memory_vault();
        assert!(vault.set_master_password("pw"));
        assert!(matches!(
            vault.update_credential("missing", "s", "u", "p", None),
            Err(VigilError::NotFound { .. })
        ));
        assert!(matches!(
            vault.delete_credential("missing"),
            Err(VigilError::NotFound { .. })
        ));
    }

    #[test]
    fn debug_output_has_no_secrets() {
        let (vault, _, _) = memory_vault();
        assert!(vault.set_master_password("super-secret-master"));
        vault.add_credential("mail", "me", "hidden-password", None).unwrap();
        let debug = format!("{vault:?}");
        assert!(!debug.contains("super-secret-master"));
        assert!(!debug.contains("hidden-password"));
        assert!(debug.contains("Unlocked"));
    }

    #[test]
    fn mask_secret_long_value() {
        assert_eq!(mask_secret("sk-ant-REDACTED"), "sk-a...mnop");
    }

    #[test]
    fn mask_secret_short_value() {
        assert_eq!(mask_secret("short"), "****");
    }

    #[test]
    fn mask_secret_exact_boundary() {
        assert_eq!(mask_secret("1234567890"), "1234...7890");
    }

    #[test]
    fn mask_secret_handles_multibyte_characters() {
        assert_eq!(mask_secret("ünïcödé-pässwörd"), "ünïc...wörd");
    }
}
