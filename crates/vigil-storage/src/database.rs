// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All access is serialized through one `rusqlite::Connection` behind a mutex.
//! Do NOT open additional connections for writes.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;
use tracing::debug;
use vigil_config::model::StorageConfig;
use vigil_core::VigilError;

use crate::migrations;

/// Single-writer SQLite database shared by the keystore and record store.
pub struct Database {
    conn: Mutex<Connection>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}

impl Database {
    /// Open (or create) the database at `path` and run pending migrations.
    ///
    /// Parent directories are created as needed.
    pub fn open(path: impl AsRef<Path>, wal_mode: bool) -> Result<Self, VigilError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(VigilError::storage)?;
        }

        let conn = Connection::open(path).map_err(VigilError::storage)?;
        let journal = if wal_mode { "WAL" } else { "DELETE" };
        conn.execute_batch(&format!(
            "PRAGMA journal_mode={journal}; PRAGMA busy_timeout=5000; PRAGMA secure_delete=ON;"
        ))
        .map_err(VigilError::storage)?;

        let db = Self::with_connection(conn)?;
        debug!(path = %path.display(), wal_mode, "database opened");
        Ok(db)
    }

    /// Open the database described by a [`StorageConfig`].
    pub fn from_config(config: &StorageConfig) -> Result<Self, VigilError> {
        Self::open(&config.database_path, config.wal_mode)
    }

    /// Open a private in-memory database (migrated, empty).
    pub fn open_in_memory() -> Result<Self, VigilError> {
        let conn = Connection::open_in_memory().map_err(VigilError::storage)?;
        Self::with_connection(conn)
    }

    fn with_connection(mut conn: Connection) -> Result<Self, VigilError> {
        migrations::run_migrations(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run `f` with exclusive access to the connection.
    pub fn call<T, F>(&self, f: F) -> Result<T, VigilError>
    where
        F: FnOnce(&mut Connection) -> Result<T, rusqlite::Error>,
    {
        let mut conn = self
            .conn
            .lock()
            .map_err(|_| VigilError::Internal("database mutex poisoned".to_string()))?;
        f(&mut conn).map_err(VigilError::storage)
    }
}
