// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the [`RecordStore`] trait.

use std::sync::Arc;

use rusqlite::{OptionalExtension, params};
use vigil_core::{RecordStore, VigilError};

use crate::database::Database;

/// Record store backed by the `records` table.
#[derive(Debug, Clone)]
pub struct SqliteRecordStore {
    db: Arc<Database>,
}

impl SqliteRecordStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

impl RecordStore for SqliteRecordStore {
    fn put(&self, name: &str, blob: &[u8]) -> Result<(), VigilError> {
        self.db.call(|conn| {
            conn.execute(
                "INSERT INTO records (name, value, updated_at)
                 VALUES (?1, ?2, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
                 ON CONFLICT(name) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![name, blob],
            )
        })?;
        Ok(())
    }

    fn get(&self, name: &str) -> Result<Option<Vec<u8>>, VigilError> {
        self.db.call(|conn| {
            conn.query_row(
                "SELECT value FROM records WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()
        })
    }

    fn remove(&self, name: &str) -> Result<(), VigilError> {
        self.db
            .call(|conn| conn.execute("DELETE FROM records WHERE name = ?1", params![name]))?;
        Ok(())
    }
}
