// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `vigil vault` command implementation.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::info;
use vigil_config::VigilConfig;
use vigil_core::VigilError;
use vigil_storage::{Database, SqliteKeystore, SqliteRecordStore};
use vigil_vault::{
    CredentialRecord, PasswordPolicy, UNDECRYPTABLE_PLACEHOLDER, Vault, generate_password,
    get_master_password, get_master_password_with_confirm, mask_secret, prompt_secret,
    read_secret_line,
};

use crate::{PasswordSource, VaultCommand};

/// One row of `vigil vault list`.
#[derive(Debug, Serialize)]
pub struct CredentialListing {
    pub id: String,
    pub service: String,
    pub username: String,
    /// Masked preview, or the undecryptable placeholder.
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub updated_at: String,
}

/// Open the vault backed by the configured SQLite database.
pub fn open_vault(config: &VigilConfig) -> Result<Vault, VigilError> {
    let db = Arc::new(Database::from_config(&config.storage)?);
    let keystore = SqliteKeystore::new(db.clone(), config.vault.keystore_service.clone());
    let records = SqliteRecordStore::new(db);
    Vault::open(Arc::new(keystore), Arc::new(records), config.vault.clone())
}

/// Run a `vigil vault` subcommand.
pub fn run_vault(config: &VigilConfig, command: VaultCommand) -> Result<(), VigilError> {
    let vault = open_vault(config)?;

    match command {
        VaultCommand::Init => {
            let password = get_master_password_with_confirm()?;
            init(&vault, &password)?;
            println!("vault initialized");
        }
        VaultCommand::Reset { yes } => {
            if !yes {
                return Err(VigilError::InvalidInput(
                    "reset deletes every stored credential; pass --yes to confirm".to_string(),
                ));
            }
            vault.reset_master_password()?;
            info!("vault reset");
            println!("vault reset; run `vigil vault init` to set a new master password");
        }
        command => {
            unlock(&vault, &get_master_password()?)?;
            run_unlocked(&vault, command)?;
        }
    }
    Ok(())
}

fn run_unlocked(vault: &Vault, command: VaultCommand) -> Result<(), VigilError> {
    match command {
        VaultCommand::Unlock => println!("master password accepted"),
        VaultCommand::Add {
            service,
            username,
            notes,
            password,
        } => {
            let secret = password.resolve("Password: ")?;
            let record = vault.add_credential(
                &service,
                &username,
                secret.expose_secret(),
                notes.as_deref(),
            )?;
            println!("added {}", record.id);
            if password.generate {
                println!("generated password: {}", secret.expose_secret());
            }
        }
        VaultCommand::List { json } => {
            let rows = listing(vault)?;
            if json {
                let out = serde_json::to_string_pretty(&rows)
                    .map_err(|e| VigilError::Internal(format!("JSON serialization failed: {e}")))?;
                println!("{out}");
            } else if rows.is_empty() {
                println!("no credentials stored");
            } else {
                for row in rows {
                    println!(
                        "{}  {:<20} {:<24} {}",
                        row.id, row.service, row.username, row.password
                    );
                }
            }
        }
        VaultCommand::Show { id } => {
            let record = vault.get_credential(&id)?;
            print_record(&record, &vault.display_password(&record));
        }
        VaultCommand::Update {
            id,
            service,
            username,
            notes,
            new_password,
            password,
        } => {
            let replacement = if new_password || password.generate || password.password_stdin {
                Some(password.resolve("New password: ")?)
            } else {
                None
            };
            let record = update(
                vault,
                &id,
                service.as_deref(),
                username.as_deref(),
                notes.as_deref(),
                replacement.as_ref(),
            )?;
            println!("updated {}", record.id);
            if password.generate
                && let Some(secret) = &replacement
            {
                println!("generated password: {}", secret.expose_secret());
            }
        }
        VaultCommand::Delete { id } => {
            vault.delete_credential(&id)?;
            println!("deleted {id}");
        }
        VaultCommand::Init | VaultCommand::Reset { .. } => {}
    }
    Ok(())
}

/// Set the master password on an uninitialized vault.
pub fn init(vault: &Vault, password: &SecretString) -> Result<(), VigilError> {
    if vault.has_master_password() {
        return Err(VigilError::InvalidInput(
            "vault is already initialized; use `vigil vault reset --yes` to start over".to_string(),
        ));
    }
    if !vault.set_master_password(password.expose_secret()) {
        return Err(VigilError::InvalidInput(
            "master password could not be set".to_string(),
        ));
    }
    Ok(())
}

/// Verify the master password, leaving the vault unlocked on success.
///
/// A missing master secret and a wrong password produce the same error.
pub fn unlock(vault: &Vault, password: &SecretString) -> Result<(), VigilError> {
    if !vault.verify_master_password(password.expose_secret()) {
        return Err(VigilError::InvalidInput("incorrect master password".to_string()));
    }
    Ok(())
}

/// Masked view of every stored credential.
pub fn listing(vault: &Vault) -> Result<Vec<CredentialListing>, VigilError> {
    Ok(vault
        .reveal_all()?
        .into_iter()
        .map(|(record, secret)| CredentialListing {
            password: match secret {
                Ok(secret) => mask_secret(secret.expose_secret()),
                Err(_) => UNDECRYPTABLE_PLACEHOLDER.to_string(),
            },
            id: record.id,
            service: record.service,
            username: record.username,
            notes: record.notes,
            updated_at: record.updated_at.to_rfc3339(),
        })
        .collect())
}

/// Apply a partial update. Omitted fields keep their stored values and an
/// omitted password is re-sealed unchanged. An empty `notes` clears them.
pub fn update(
    vault: &Vault,
    id: &str,
    service: Option<&str>,
    username: Option<&str>,
    notes: Option<&str>,
    password: Option<&SecretString>,
) -> Result<CredentialRecord, VigilError> {
    let current = vault.get_credential(id)?;
    let decrypted;
    let password = match password {
        Some(password) => password.expose_secret(),
        None => {
            decrypted = vault.decrypt_credential(&current)?;
            decrypted.expose_secret()
        }
    };
    let notes = match notes {
        Some("") => None,
        Some(notes) => Some(notes),
        None => current.notes.as_deref(),
    };

    vault.update_credential(
        id,
        service.unwrap_or(&current.service),
        username.unwrap_or(&current.username),
        password,
        notes,
    )
}

fn print_record(record: &CredentialRecord, password: &str) {
    println!("id:       {}", record.id);
    println!("service:  {}", record.service);
    println!("username: {}", record.username);
    println!("password: {password}");
    if let Some(notes) = &record.notes {
        println!("notes:    {notes}");
    }
    println!("created:  {}", record.created_at.to_rfc3339());
    println!("updated:  {}", record.updated_at.to_rfc3339());
}

impl PasswordSource {
    fn resolve(&self, prompt: &str) -> Result<SecretString, VigilError> {
        if self.generate {
            let policy = PasswordPolicy {
                length: self.length,
                ..PasswordPolicy::default()
            };
            generate_password(&policy)
        } else if self.password_stdin {
            read_secret_line(std::io::stdin().lock())
        } else {
            prompt_secret(prompt)
        }
    }
}
