// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory keystore and record store.
//!
//! Nothing survives the process. Used by tests and by hosts that only need an
//! ephemeral vault.

use std::collections::HashMap;
use std::sync::Mutex;

use vigil_core::{RecordStore, SecureKeystore, VigilError};

fn poisoned() -> VigilError {
    VigilError::Internal("in-memory store mutex poisoned".to_string())
}

/// [`SecureKeystore`] holding entries in a process-local map.
#[derive(Debug, Default)]
pub struct MemoryKeystore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryKeystore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SecureKeystore for MemoryKeystore {
    fn save(&self, key: &str, value: &[u8]) -> Result<(), VigilError> {
        self.entries
            .lock()
            .map_err(|_| poisoned())?
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, VigilError> {
        Ok(self.entries.lock().map_err(|_| poisoned())?.get(key).cloned())
    }

    fn delete(&self, key: &str) -> Result<(), VigilError> {
        self.entries.lock().map_err(|_| poisoned())?.remove(key);
        Ok(())
    }
}

/// [`RecordStore`] holding blobs in a process-local map.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite a blob directly, bypassing any caller. Lets tests corrupt state.
    pub fn tamper(&self, name: &str, blob: &[u8]) {
        if let Ok(mut blobs) = self.blobs.lock() {
            blobs.insert(name.to_string(), blob.to_vec());
        }
    }
}

impl RecordStore for MemoryRecordStore {
    fn put(&self, name: &str, blob: &[u8]) -> Result<(), VigilError> {
        self.blobs
            .lock()
            .map_err(|_| poisoned())?
            .insert(name.to_string(), blob.to_vec());
        Ok(())
    }

    fn get(&self, name: &str) -> Result<Option<Vec<u8>>, VigilError> {
        Ok(self.blobs.lock().map_err(|_| poisoned())?.get(name).cloned())
    }

    fn remove(&self, name: &str) -> Result<(), VigilError> {
        self.blobs.lock().map_err(|_| poisoned())?.remove(name);
        Ok(())
    }
}
