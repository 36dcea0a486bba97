// SPDX-FileCopyrightText: 2026 Vidra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./vidra.toml` > `~/.config/vidra/vidra.toml` > `/etc/vidra/vidra.toml`
//! with environment variable overrides via `VIDRA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::VidraConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/vidra/vidra.toml` (system-wide)
/// 3. `~/.config/vidra/vidra.toml` (user XDG config)
/// 4. `./vidra.toml` (local directory)
/// 5. `VIDRA_*` environment variables
pub fn load_config() -> Result<VidraConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a specific TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<VidraConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VidraConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<VidraConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VidraConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(VidraConfig::default()))
        .merge(Toml::file("/etc/vidra/vidra.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("vidra/vidra.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("vidra.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `VIDRA_TELEGRAM_BOT_TOKEN` must map to
/// `telegram.bot_token`, not `telegram.bot.token`.
fn env_provider() -> Env {
    Env::prefixed("VIDRA_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: VIDRA_TELEGRAM_BOT_TOKEN -> "telegram_bot_token"
        let key_str = key.as_str();
        let mapped = match key_str.split_once('_') {
            Some((section @ ("bot" | "telegram" | "storage" | "download"), rest)) => {
                format!("{section}.{rest}")
            }
            _ => key_str.to_string(),
        };
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn str_loader_merges_over_defaults() {
        let config = load_config_from_str(
            r#"
[telegram]
bot_token = "42:token"
"#,
        )
        .expect("valid TOML");
        assert_eq!(config.telegram.bot_token.as_deref(), Some("42:token"));
        // Untouched sections keep their defaults.
        assert_eq!(config.bot.name, "vidra");
    }
}
