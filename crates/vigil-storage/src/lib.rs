// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for Vigil.
//!
//! Provides a single-writer SQLite database with embedded migrations, a
//! [`SqliteKeystore`] for master-secret material, a [`SqliteRecordStore`] for
//! general persisted blobs, and in-memory equivalents for tests.

pub mod database;
pub mod keystore;
pub mod memory;
pub mod migrations;
pub mod records;

pub use database::Database;
pub use keystore::SqliteKeystore;
pub use memory::{MemoryKeystore, MemoryRecordStore};
pub use records::SqliteRecordStore;
