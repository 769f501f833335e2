// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end vault behaviour over the SQLite keystore and record store.

use std::sync::Arc;

use secrecy::ExposeSecret;
use vigil_config::model::VaultConfig;
use vigil_core::VigilError;
use vigil_core::RecordStore;
use vigil_storage::{Database, MemoryKeystore, MemoryRecordStore, SqliteKeystore, SqliteRecordStore};
use vigil_vault::vault::CREDENTIALS_RECORD;
use vigil_vault::{LockState, UNDECRYPTABLE_PLACEHOLDER, Vault};

fn test_config() -> VaultConfig {
    VaultConfig {
        kdf_iterations: 1_000,
        ..VaultConfig::default()
    }
}

fn open_vault(db: &Arc<Database>) -> Vault {
    let keystore = Arc::new(SqliteKeystore::new(db.clone(), "vigil.test"));
    let records = Arc::new(SqliteRecordStore::new(db.clone()));
    Vault::open(keystore, records, test_config()).unwrap()
}

fn memory_db() -> Arc<Database> {
    Arc::new(Database::open_in_memory().unwrap())
}

#[test]
fn add_then_decrypt_round_trips() {
    let vault = open_vault(&memory_db());
    assert!(vault.set_master_password("master-pw"));

    let long = "x".repeat(4096);
    for plaintext in ["hunter2", "", "päss wörd with spaces", "🔐🔑", long.as_str()] {
        let record = vault.add_credential("svc", "user", plaintext, None).unwrap();
        assert_eq!(vault.decrypt_credential(&record).unwrap().expose_secret(), plaintext);
    }
}

#[test]
fn same_plaintext_encrypts_differently() {
    let vault = open_vault(&memory_db());
    assert!(vault.set_master_password("master-pw"));

    let a = vault.add_credential("svc", "user", "same", None).unwrap();
    let b = vault.add_credential("svc", "user", "same", None).unwrap();

    assert_ne!(a.ciphertext, b.ciphertext);
    assert_eq!(vault.decrypt_credential(&a).unwrap().expose_secret(), "same");
    assert_eq!(vault.decrypt_credential(&b).unwrap().expose_secret(), "same");
}

#[test]
fn reset_then_new_master_orphans_old_records() {
    let vault = open_vault(&memory_db());
    assert!(vault.set_master_password("first"));
    let old = vault.add_credential("svc", "user", "old-secret", None).unwrap();

    vault.reset_master_password().unwrap();
    assert_eq!(vault.state(), LockState::Uninitialized);
    assert!(vault.credentials().unwrap().is_empty());
    assert!(!vault.has_master_password());

    assert!(vault.set_master_password("second"));
    assert!(matches!(
        vault.decrypt_credential(&old),
        Err(VigilError::DecryptionFailed(_))
    ));
}

#[test]
fn setting_master_again_without_reset_orphans_records() {
    let vault = open_vault(&memory_db());
    assert!(vault.set_master_password("first"));
    let old = vault.add_credential("svc", "user", "old-secret", None).unwrap();

    assert!(vault.set_master_password("second"));
    assert_eq!(vault.credentials().unwrap().len(), 1);
    assert!(matches!(
        vault.decrypt_credential_by_id(&old.id),
        Err(VigilError::DecryptionFailed(_))
    ));
    assert_eq!(vault.display_password(&old), UNDECRYPTABLE_PLACEHOLDER);
}

#[test]
fn verify_matches_only_last_set_password() {
    let vault = open_vault(&memory_db());
    assert!(!vault.verify_master_password("never-set"));

    assert!(vault.set_master_password("first"));
    assert!(vault.set_master_password("second"));

    assert!(vault.verify_master_password("second"));
    assert!(!vault.verify_master_password("first"));
    assert!(!vault.verify_master_password(""));
    assert!(!vault.verify_master_password("Second"));
}

#[test]
fn delete_reduces_count_and_id_is_gone() {
    let vault = open_vault(&memory_db());
    assert!(vault.set_master_password("pw"));
    let keep = vault.add_credential("keep", "u", "k", None).unwrap();
    let gone = vault.add_credential("gone", "u", "g", Some("note")).unwrap();

    vault.delete_credential(&gone.id).unwrap();

    let remaining = vault.credentials().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, keep.id);
    assert!(matches!(
        vault.decrypt_credential_by_id(&gone.id),
        Err(VigilError::NotFound { .. })
    ));
}

#[test]
fn update_preserves_id_and_creation_time() {
    let vault = open_vault(&memory_db());
    assert!(vault.set_master_password("pw"));
    let original = vault.add_credential("mail", "old@example.com", "old-pw", None).unwrap();

    let updated = vault
        .update_credential(&original.id, "mail", "new@example.com", "new-pw", Some("rotated"))
        .unwrap();

    assert_eq!(updated.id, original.id);
    assert_eq!(updated.created_at, original.created_at);
    assert!(updated.updated_at >= original.updated_at);
    assert_eq!(updated.notes.as_deref(), Some("rotated"));
    assert_eq!(
        vault.decrypt_credential_by_id(&original.id).unwrap().expose_secret(),
        "new-pw"
    );
    assert_eq!(vault.get_credential(&original.id).unwrap().username, "new@example.com");
}

#[test]
fn vault_survives_process_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vigil.db");

    let id = {
        let db = Arc::new(Database::open(&path, true).unwrap());
        let vault = open_vault(&db);
        assert!(vault.set_master_password("persisted"));
        vault.add_credential("bank", "me", "s3cret", None).unwrap().id
    };

    let db = Arc::new(Database::open(&path, true).unwrap());
    let vault = open_vault(&db);
    assert_eq!(vault.state(), LockState::Locked);
    assert_eq!(vault.credentials().unwrap().len(), 1);
    assert!(matches!(vault.decrypt_credential_by_id(&id), Err(VigilError::VaultLocked)));

    assert!(!vault.verify_master_password("wrong"));
    assert!(vault.verify_master_password("persisted"));
    assert_eq!(vault.decrypt_credential_by_id(&id).unwrap().expose_secret(), "s3cret");
}

#[test]
fn corrupted_stored_record_does_not_block_others() {
    let keystore = Arc::new(MemoryKeystore::new());
    let records = Arc::new(MemoryRecordStore::new());
    let vault = Vault::open(keystore.clone(), records.clone(), test_config()).unwrap();
    assert!(vault.set_master_password("pw"));
    vault.add_credential("good", "u", "fine", None).unwrap();
    vault.add_credential("bad", "u", "broken", None).unwrap();
    vault.add_credential("also-good", "u", "okay", None).unwrap();

    let blob = records.get(CREDENTIALS_RECORD).unwrap().unwrap();
    let mut stored: serde_json::Value = serde_json::from_slice(&blob).unwrap();
    for entry in stored.as_array_mut().unwrap() {
        if entry["service"] == "bad" {
            entry["ciphertext"] = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA".into();
        }
    }
    records.tamper(CREDENTIALS_RECORD, &serde_json::to_vec(&stored).unwrap());

    let reopened = Vault::open(keystore, records, test_config()).unwrap();
    assert!(reopened.verify_master_password("pw"));
    let revealed = reopened.reveal_all().unwrap();
    assert_eq!(revealed.len(), 3);

    let failed: Vec<_> = revealed
        .iter()
        .filter(|(_, secret)| matches!(secret, Err(VigilError::DecryptionFailed(_))))
        .map(|(record, _)| record.service.as_str())
        .collect();
    assert_eq!(failed, ["bad"]);
    for (record, secret) in &revealed {
        match record.service.as_str() {
            "good" => assert_eq!(secret.as_ref().unwrap().expose_secret(), "fine"),
            "also-good" => assert_eq!(secret.as_ref().unwrap().expose_secret(), "okay"),
            _ => assert_eq!(reopened.display_password(record), UNDECRYPTABLE_PLACEHOLDER),
        }
    }
}

#[test]
fn reveal_all_isolates_undecryptable_records() {
    let db = memory_db();
    let vault = open_vault(&db);
    assert!(vault.set_master_password("first"));
    vault.add_credential("old", "u", "old", None).unwrap();
    assert!(vault.set_master_password("second"));
    vault.add_credential("new", "u", "new", None).unwrap();

    let revealed = vault.reveal_all().unwrap();
    let by_service = |name: &str| {
        revealed
            .iter()
            .find(|(record, _)| record.service == name)
            .map(|(_, secret)| secret.as_ref().map(|s| s.expose_secret().to_string()))
            .unwrap()
    };
    assert!(matches!(by_service("old"), Err(VigilError::DecryptionFailed(_))));
    assert_eq!(by_service("new").unwrap(), "new");
}

#[test]
fn concurrent_adds_are_all_persisted() {
    let db = memory_db();
    let vault = Arc::new(open_vault(&db));
    assert!(vault.set_master_password("pw"));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let vault = vault.clone();
            std::thread::spawn(move || {
                vault
                    .add_credential(&format!("svc-{i}"), "u", "p", None)
                    .unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(vault.credentials().unwrap().len(), 8);
    let reopened = open_vault(&db);
    assert_eq!(reopened.credentials().unwrap().len(), 8);
}
