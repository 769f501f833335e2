// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record store trait for general (non-secret) persisted blobs.

use crate::error::VigilError;

/// Opaque blob persistence keyed by fixed names.
pub trait RecordStore: Send + Sync {
    /// Writes `blob` under `name`, replacing any previous blob.
    fn put(&self, name: &str, blob: &[u8]) -> Result<(), VigilError>;

    /// Reads the blob under `name`, or `None` if absent.
    fn get(&self, name: &str) -> Result<Option<Vec<u8>>, VigilError>;

    /// Removes the blob under `name`. Removing a missing blob succeeds.
    fn remove(&self, name: &str) -> Result<(), VigilError>;
}
