// SPDX-FileCopyrightText: 2026 Vidra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `vidra serve` command implementation.
//!
//! Wires the SQLite storage, the HTTP download backend, and the Telegram
//! channel together, then blocks on long polling until ctrl-c.

use std::sync::Arc;

use tracing::info;

use vidra_agent::Resolver;
use vidra_config::VidraConfig;
use vidra_core::VidraError;
use vidra_fetch::HttpDownloader;
use vidra_storage::SqliteStorage;
use vidra_telegram::VidraBot;

/// Runs the bot until shutdown.
pub async fn run_serve(config: VidraConfig) -> Result<(), VidraError> {
    init_tracing(&config.bot.log_level);

    info!(name = config.bot.name.as_str(), "starting vidra");

    let Some(token) = config.telegram.bot_token.clone() else {
        eprintln!(
            "error: Telegram bot token required. Set telegram.bot_token in vidra.toml \
             or the VIDRA_TELEGRAM_BOT_TOKEN environment variable."
        );
        return Err(VidraError::Config("telegram.bot_token is required".into()));
    };

    let storage = Arc::new(SqliteStorage::open(&config.storage).await?);
    info!(
        path = config.storage.database_path.as_str(),
        "storage ready"
    );

    let downloader = Arc::new(HttpDownloader::new(&config.download)?);

    let resolver = Resolver {
        requests: storage.clone(),
        settings: storage.clone(),
        stats: storage,
        downloader,
    };

    let bot = VidraBot::new(&token, resolver, config.telegram.error_delete_secs)?;
    info!("telegram channel ready");

    bot.run().await;

    info!("vidra shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("vidra={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
