// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Vigil.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Vigil configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VigilConfig {
    /// Credential vault settings.
    #[serde(default)]
    pub vault: VaultConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Risk assessment fusion settings.
    #[serde(default)]
    pub assessment: AssessmentConfig,

    /// Remote classifier (Gemini) settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Credential vault configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// PBKDF2-HMAC-SHA256 iteration count used when a master password is set.
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Length in bytes of freshly generated salts.
    #[serde(default = "default_salt_len")]
    pub salt_len: usize,

    /// Service identifier scoping entries in the secure keystore.
    #[serde(default = "default_keystore_service")]
    pub keystore_service: String,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            kdf_iterations: default_kdf_iterations(),
            salt_len: default_salt_len(),
            keystore_service: default_keystore_service(),
        }
    }
}

fn default_kdf_iterations() -> u32 {
    100_000
}

fn default_salt_len() -> usize {
    16
}

fn default_keystore_service() -> String {
    "vigil.vault".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("vigil").join("vigil.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("vigil.db"))
        .display()
        .to_string()
}

fn default_wal_mode() -> bool {
    true
}

/// Risk assessment fusion configuration.
///
/// The defaults are the shipped policy; changing them changes verdicts.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AssessmentConfig {
    /// Red flags that downgrade a local `Safe` to `Suspicious`.
    #[serde(default = "default_safe_escalation_threshold")]
    pub safe_escalation_threshold: u32,

    /// Red flags that upgrade a local `Suspicious` to `Unsafe`.
    #[serde(default = "default_suspicious_escalation_threshold")]
    pub suspicious_escalation_threshold: u32,

    /// Red flags that force `Unsafe` when no local verdict exists.
    #[serde(default = "default_fallback_escalation_threshold")]
    pub fallback_escalation_threshold: u32,

    /// Treat a missing local verdict as approval. Off by default, which makes
    /// `Safe` unreachable without a local verdict.
    #[serde(default)]
    pub treat_missing_local_as_approved: bool,

    /// Skip the remote classifier for `https` URLs.
    #[serde(default = "default_bypass_remote_on_https")]
    pub bypass_remote_on_https: bool,

    /// Heuristic score at or above which the local classifier answers `Unsafe`.
    #[serde(default = "default_unsafe_score_threshold")]
    pub unsafe_score_threshold: u32,
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            safe_escalation_threshold: default_safe_escalation_threshold(),
            suspicious_escalation_threshold: default_suspicious_escalation_threshold(),
            fallback_escalation_threshold: default_fallback_escalation_threshold(),
            treat_missing_local_as_approved: false,
            bypass_remote_on_https: default_bypass_remote_on_https(),
            unsafe_score_threshold: default_unsafe_score_threshold(),
        }
    }
}

fn default_safe_escalation_threshold() -> u32 {
    3
}

fn default_suspicious_escalation_threshold() -> u32 {
    2
}

fn default_fallback_escalation_threshold() -> u32 {
    3
}

fn default_bypass_remote_on_https() -> bool {
    true
}

fn default_unsafe_score_threshold() -> u32 {
    3
}

/// Gemini API configuration for the remote classifier.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// Gemini API key. `None` disables the remote classifier.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model used for classification.
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// API base URL (without the `/v1beta/...` path).
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries after a transient HTTP status (429, 500, 503).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_gemini_model(),
            base_url: default_gemini_base_url(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_gemini_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    1
}

/// Log output configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
