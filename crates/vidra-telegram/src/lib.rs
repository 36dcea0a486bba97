// SPDX-FileCopyrightText: 2026 Vidra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram channel adapter for the Vidra media bot.
//!
//! Wires the four update surfaces (message, callback query, inline query,
//! chosen inline result) into the orchestration core via teloxide long
//! polling. The handlers stay thin: normalize the update, then call into
//! `vidra-agent`.

pub mod admin;
pub mod download;
pub mod settings;
pub mod target;

use std::sync::Arc;

use teloxide::dptree;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use tracing::info;

use vidra_agent::{Membership, Menu, Resolver, SceneStore};
use vidra_core::VidraError;

use crate::admin::TelegramMembership;

/// Shared state injected into every update handler.
pub struct AppState {
    pub resolver: Resolver,
    pub scenes: SceneStore,
    pub membership: Arc<dyn Membership>,
    /// Delay before an error status message is deleted in shared chats.
    pub error_delete_secs: u64,
}

/// The Telegram bot service.
///
/// Owns the teloxide `Bot` and the shared handler state; `run` blocks on
/// the long-polling dispatcher until shutdown.
pub struct VidraBot {
    bot: Bot,
    state: Arc<AppState>,
}

impl VidraBot {
    /// Creates the bot service from a token and the orchestration core.
    pub fn new(token: &str, resolver: Resolver, error_delete_secs: u64) -> Result<Self, VidraError> {
        if token.is_empty() {
            return Err(VidraError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        let bot = Bot::new(token);
        let membership = Arc::new(TelegramMembership { bot: bot.clone() });
        let state = Arc::new(AppState {
            resolver,
            scenes: SceneStore::new(),
            membership,
            error_delete_secs,
        });
        Ok(Self { bot, state })
    }

    /// Returns a reference to the underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    /// Runs long polling until the process is told to stop.
    pub async fn run(self) {
        info!("starting Telegram long polling");

        let handler = dptree::entry()
            .branch(Update::filter_message().endpoint(download::handle_message))
            .branch(Update::filter_callback_query().endpoint(download::handle_callback_query))
            .branch(Update::filter_inline_query().endpoint(download::handle_inline_query))
            .branch(
                Update::filter_chosen_inline_result()
                    .endpoint(download::handle_chosen_inline_result),
            );

        Dispatcher::builder(self.bot, handler)
            .dependencies(dptree::deps![self.state])
            .default_handler(|_| async {}) // Silently ignore other update kinds
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    }
}

/// Converts an agent menu into a Telegram inline keyboard.
pub(crate) fn keyboard(menu: &Menu) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(menu.rows.iter().map(|row| {
        row.iter()
            .map(|b| InlineKeyboardButton::callback(b.label.clone(), b.payload.clone()))
            .collect::<Vec<_>>()
    }))
}
