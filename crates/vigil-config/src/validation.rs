// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as minimum KDF work factors, non-empty paths, and sane thresholds.

use crate::diagnostic::ConfigError;
use crate::model::VigilConfig;

/// Lowest PBKDF2 iteration count accepted from configuration.
pub const MIN_KDF_ITERATIONS: u32 = 100_000;

/// Shortest salt accepted from configuration.
pub const MIN_SALT_LEN: usize = 16;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &VigilConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.vault.kdf_iterations < MIN_KDF_ITERATIONS {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.kdf_iterations must be at least {MIN_KDF_ITERATIONS}, got {}",
                config.vault.kdf_iterations
            ),
        });
    }

    if config.vault.salt_len < MIN_SALT_LEN {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.salt_len must be at least {MIN_SALT_LEN} bytes, got {}",
                config.vault.salt_len
            ),
        });
    }

    if config.vault.keystore_service.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "vault.keystore_service must not be empty".to_string(),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    let thresholds = [
        (
            "assessment.safe_escalation_threshold",
            config.assessment.safe_escalation_threshold,
        ),
        (
            "assessment.suspicious_escalation_threshold",
            config.assessment.suspicious_escalation_threshold,
        ),
        (
            "assessment.fallback_escalation_threshold",
            config.assessment.fallback_escalation_threshold,
        ),
        (
            "assessment.unsafe_score_threshold",
            config.assessment.unsafe_score_threshold,
        ),
    ];
    for (key, value) in thresholds {
        if value == 0 {
            errors.push(ConfigError::Validation {
                message: format!("{key} must be at least 1"),
            });
        }
    }

    if config.gemini.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "gemini.timeout_secs must be greater than 0".to_string(),
        });
    }

    if let Some(key) = &config.gemini.api_key
        && key.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "gemini.api_key must not be blank when set".to_string(),
        });
    }

    let level = config.logging.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "logging.level `{}` is not one of {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
