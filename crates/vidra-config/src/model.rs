// SPDX-FileCopyrightText: 2026 Vidra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Vidra media bot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Vidra configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VidraConfig {
    /// Bot identity and logging settings.
    #[serde(default)]
    pub bot: BotConfig,

    /// Telegram Bot API settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Download backend settings.
    #[serde(default)]
    pub download: DownloadConfig,
}

/// Bot identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Display name of the bot.
    #[serde(default = "default_bot_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_bot_name() -> String {
    "vidra".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telegram Bot API configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. Required to start the bot.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Seconds an error status message survives in group chats before the
    /// delayed cleanup deletes it.
    #[serde(default = "default_error_delete_secs")]
    pub error_delete_secs: u64,
}

fn default_error_delete_secs() -> u64 {
    30
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
        .map(|p| p.join("vidra").join("vidra.db"))
        .and_then(|p| p.to_str().map(String::from))
        .unwrap_or_else(|| "vidra.db".to_string())
}

fn default_wal_mode() -> bool {
    true
}

/// Download backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DownloadConfig {
    /// Per-reference fetch timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Upper bound on a fetched payload, in bytes.
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_file_bytes: default_max_file_bytes(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_max_file_bytes() -> u64 {
    // Bot API ceiling for URL-sourced uploads.
    50 * 1024 * 1024
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = VidraConfig::default();
        assert_eq!(config.bot.name, "vidra");
        assert_eq!(config.bot.log_level, "info");
        assert!(config.telegram.bot_token.is_none());
        assert_eq!(config.telegram.error_delete_secs, 30);
        assert!(config.storage.wal_mode);
        assert_eq!(config.download.timeout_secs, 120);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let toml_str = r#"
[bot]
naem = "x"
"#;
        assert!(toml::from_str::<VidraConfig>(toml_str).is_err());
    }
}
