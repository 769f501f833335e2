// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Vigil.
//!
//! This crate provides the error taxonomy, the verdict and chat types, and the
//! collaborator traits that storage backends and classifiers implement.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::VigilError;
pub use types::{AssessmentVerdict, ChatRole, ChatTurn};

pub use traits::{LocalClassifier, RecordStore, RemoteClassifier, SecureKeystore};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_do_not_leak_detail_for_auth_failures() {
        assert_eq!(VigilError::MasterPasswordNotSet.to_string(), "master password is not set");
        assert_eq!(VigilError::VaultLocked.to_string(), "vault is locked");
        assert_eq!(
            VigilError::NotFound { id: "abc".into() }.to_string(),
            "credential not found: abc"
        );
    }

    #[test]
    fn storage_helper_wraps_source() {
        let err = VigilError::storage(std::io::Error::other("disk gone"));
        assert!(matches!(err, VigilError::Storage { .. }));
        assert!(err.to_string().contains("disk gone"));
    }

    #[test]
    fn remote_helper_has_no_source() {
        let err = VigilError::remote("timeout");
        assert!(matches!(
            err,
            VigilError::RemoteUnavailable { ref message, source: None } if message == "timeout"
        ));
    }

    #[test]
    fn all_collaborator_traits_are_object_safe() {
        fn _keystore(_: &dyn SecureKeystore) {}
        fn _records(_: &dyn RecordStore) {}
        fn _local(_: &dyn LocalClassifier) {}
        fn _remote(_: &dyn RemoteClassifier) {}
    }
}
