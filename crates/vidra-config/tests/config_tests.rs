// SPDX-FileCopyrightText: 2026 Vidra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Vidra configuration system.

use vidra_config::diagnostic::{ConfigError, suggest_key};
use vidra_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_vidra_config() {
    let toml = r#"
[bot]
name = "test-bot"
log_level = "debug"

[telegram]
bot_token = "123:ABC"
error_delete_secs = 15

[storage]
database_path = "/tmp/test.db"
wal_mode = false

[download]
timeout_secs = 60
max_file_bytes = 1048576
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.bot.name, "test-bot");
    assert_eq!(config.bot.log_level, "debug");
    assert_eq!(config.telegram.bot_token.as_deref(), Some("123:ABC"));
    assert_eq!(config.telegram.error_delete_secs, 15);
    assert_eq!(config.storage.database_path, "/tmp/test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.download.timeout_secs, 60);
    assert_eq!(config.download.max_file_bytes, 1_048_576);
}

/// Unknown field in [telegram] section produces an error.
#[test]
fn unknown_field_in_telegram_produces_error() {
    let toml = r#"
[telegram]
bot_tokn = "abc"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("bot_tokn"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.bot.name, "vidra");
    assert_eq!(config.bot.log_level, "info");
    assert!(config.telegram.bot_token.is_none());
    assert_eq!(config.telegram.error_delete_secs, 30);
    assert!(config.storage.wal_mode);
    assert_eq!(config.download.timeout_secs, 120);
}

/// The full pipeline converts figment unknown-field errors into diagnostics
/// with a typo suggestion.
#[test]
fn unknown_key_gets_suggestion_diagnostic() {
    let errors = load_and_validate_str(
        r#"
[telegram]
bot_tokn = "abc"
"#,
    )
    .expect_err("should produce diagnostics");

    let unknown = errors
        .iter()
        .find_map(|e| match e {
            ConfigError::UnknownKey {
                key, suggestion, ..
            } => Some((key.clone(), suggestion.clone())),
            _ => None,
        })
        .expect("should contain an UnknownKey diagnostic");

    assert_eq!(unknown.0, "bot_tokn");
    assert_eq!(unknown.1.as_deref(), Some("bot_token"));
}

/// Validation errors surface through load_and_validate_str.
#[test]
fn semantic_validation_runs_after_deserialization() {
    let errors = load_and_validate_str(
        r#"
[bot]
log_level = "loud"
"#,
    )
    .expect_err("bogus log level should fail validation");

    assert!(errors.iter().any(
        |e| matches!(e, ConfigError::Validation { message } if message.contains("log_level"))
    ));
}

/// suggest_key is exported for reuse and behaves at the boundary.
#[test]
fn suggest_key_threshold_behaviour() {
    assert_eq!(
        suggest_key("databse_path", &["database_path", "wal_mode"]),
        Some("database_path".to_string())
    );
    assert_eq!(suggest_key("qqq", &["database_path", "wal_mode"]), None);
}
