// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions.
//!
//! Persistence traits are synchronous: the vault exposes blocking,
//! atomic-per-call operations and hosts offload them as they see fit.
//! The remote classifier is async and uses `#[async_trait]` for dynamic
//! dispatch compatibility.

pub mod classifier;
pub mod keystore;
pub mod record_store;

pub use classifier::{LocalClassifier, RemoteClassifier};
pub use keystore::SecureKeystore;
pub use record_store::RecordStore;
