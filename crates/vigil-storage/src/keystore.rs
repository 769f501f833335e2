// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the [`SecureKeystore`] trait.
//!
//! Stands in for a platform keychain on hosts that have none. Entries are
//! scoped by a service identifier so several vaults can share one database.

use std::sync::Arc;

use rusqlite::{OptionalExtension, params};
use tracing::debug;
use vigil_core::{SecureKeystore, VigilError};

use crate::database::Database;

/// Keystore backed by the `keystore_items` table.
#[derive(Debug, Clone)]
pub struct SqliteKeystore {
    db: Arc<Database>,
    service: String,
}

impl SqliteKeystore {
    /// Create a keystore view over `db` scoped to `service`.
    pub fn new(db: Arc<Database>, service: impl Into<String>) -> Self {
        Self {
            db,
            service: service.into(),
        }
    }

    /// The service identifier scoping this keystore's entries.
    pub fn service(&self) -> &str {
        &self.service
    }
}

impl SecureKeystore for SqliteKeystore {
    fn save(&self, key: &str, value: &[u8]) -> Result<(), VigilError> {
        self.db
            .call(|conn| {
                conn.execute(
                    "INSERT INTO keystore_items (service, key, value, updated_at)
                     VALUES (?1, ?2, ?3, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
                     ON CONFLICT(service, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                    params![self.service, key, value],
                )
            })
            .map_err(|e| VigilError::Keystore(format!("save `{key}` failed: {e}")))?;
        debug!(service = %self.service, key = %key, "keystore entry saved");
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, VigilError> {
        self.db
            .call(|conn| {
                conn.query_row(
                    "SELECT value FROM keystore_items WHERE service = ?1 AND key = ?2",
                    params![self.service, key],
                    |row| row.get(0),
                )
                .optional()
            })
            .map_err(|e| VigilError::Keystore(format!("load `{key}` failed: {e}")))
    }

    fn delete(&self, key: &str) -> Result<(), VigilError> {
        self.db
            .call(|conn| {
                conn.execute(
                    "DELETE FROM keystore_items WHERE service = ?1 AND key = ?2",
                    params![self.service, key],
                )
            })
            .map_err(|e| VigilError::Keystore(format!("delete `{key}` failed: {e}")))?;
        debug!(service = %self.service, key = %key, "keystore entry deleted");
        Ok(())
    }
}
