// SPDX-FileCopyrightText: 2026 Vidra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Settings menu navigation and the custom-value scene.
//!
//! The menu itself is built in `vidra-agent`; this module owns the
//! transitions: admin gating, edits of the menu message, and the free-text
//! capture that the sentinel "custom" option switches a caller into.

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{MessageId, ReplyParameters};
use tracing::{debug, error};

use vidra_agent::menu::{self, SettingValue};
use vidra_agent::{SettingOutcome, apply_setting};
use vidra_core::i18n::Texts;
use vidra_core::{ChatScope, SettingKey, Settings, UserId};

use crate::{AppState, keyboard};

/// Sends a fresh settings root menu into a chat.
///
/// Triggered by `/settings` and by the `settings` deep-link start
/// parameter that inline answers advertise.
pub async fn send_settings_menu(
    bot: &Bot,
    chat_id: ChatId,
    reply_to: Option<MessageId>,
    state: &AppState,
    client_lang: Option<&str>,
) -> ResponseResult<()> {
    let scope = ChatScope(chat_id.0);
    let settings = current_settings(state, scope).await;
    let texts = Texts::for_settings(&settings, client_lang);

    let root = menu::settings_menu(&texts, &settings);
    let mut request = bot
        .send_message(chat_id, root.title.clone())
        .reply_markup(keyboard(&root));
    if let Some(message_id) = reply_to {
        request = request.reply_parameters(ReplyParameters::new(message_id));
    }
    request.await?;
    Ok(())
}

/// `set:{key}`: open the field menu for one setting.
pub async fn handle_open_setting(
    bot: Bot,
    q: CallbackQuery,
    state: Arc<AppState>,
    key: SettingKey,
) -> ResponseResult<()> {
    let Some((chat_id, message_id)) = message_coords(&q) else {
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    };
    let scope = ChatScope(chat_id.0);
    let actor = UserId(q.from.id.0 as i64);
    let client_lang = q.from.language_code.clone();

    if !gate_admin(&bot, &q, state.as_ref(), scope, actor, client_lang.as_deref()).await? {
        return Ok(());
    }

    let settings = current_settings(state.as_ref(), scope).await;
    let texts = Texts::for_settings(&settings, client_lang.as_deref());
    let field = menu::setting_menu(&texts, &settings, key);
    edit_menu(&bot, chat_id, message_id, &field.title, &field).await?;
    bot.answer_callback_query(q.id).await?;
    Ok(())
}

/// `set:back`: return from a field menu to the root.
pub async fn handle_back(bot: Bot, q: CallbackQuery, state: Arc<AppState>) -> ResponseResult<()> {
    let Some((chat_id, message_id)) = message_coords(&q) else {
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    };
    let scope = ChatScope(chat_id.0);
    let actor = UserId(q.from.id.0 as i64);
    let client_lang = q.from.language_code.clone();

    if !gate_admin(&bot, &q, state.as_ref(), scope, actor, client_lang.as_deref()).await? {
        return Ok(());
    }

    let settings = current_settings(state.as_ref(), scope).await;
    let texts = Texts::for_settings(&settings, client_lang.as_deref());
    let root = menu::settings_menu(&texts, &settings);
    edit_menu(&bot, chat_id, message_id, &root.title, &root).await?;
    bot.answer_callback_query(q.id).await?;
    Ok(())
}

/// `setv:{key}:{index}`: apply a literal value or enter the custom scene.
pub async fn handle_set_value(
    bot: Bot,
    q: CallbackQuery,
    state: Arc<AppState>,
    key: SettingKey,
    index: usize,
) -> ResponseResult<()> {
    let Some((chat_id, message_id)) = message_coords(&q) else {
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    };
    let scope = ChatScope(chat_id.0);
    let actor = UserId(q.from.id.0 as i64);
    let client_lang = q.from.language_code.clone();

    let Some(value) = menu::setting_values(key).get(index).copied() else {
        // Stale keyboard from an older bot build.
        bot.answer_callback_query(q.id).await?;
        return Ok(());
    };

    match value {
        SettingValue::Custom => {
            if !gate_admin(&bot, &q, state.as_ref(), scope, actor, client_lang.as_deref()).await? {
                return Ok(());
            }
            let settings = current_settings(state.as_ref(), scope).await;
            let texts = Texts::for_settings(&settings, client_lang.as_deref());
            let field = menu::setting_menu(&texts, &settings, key);
            edit_menu(
                &bot,
                chat_id,
                message_id,
                &texts.text("settings.custom-prompt"),
                &field,
            )
            .await?;
            state.scenes.enter(scope, actor, key);
        }
        SettingValue::Literal(raw) => {
            let outcome = apply_setting(
                state.membership.as_ref(),
                state.resolver.settings.as_ref(),
                scope,
                actor,
                key,
                raw,
            )
            .await;

            let effective = match outcome {
                Ok(SettingOutcome::Denied) => {
                    let settings = current_settings(state.as_ref(), scope).await;
                    let texts = Texts::for_settings(&settings, client_lang.as_deref());
                    bot.answer_callback_query(q.id)
                        .text(texts.text("settings.admin-only"))
                        .await?;
                    return Ok(());
                }
                Ok(SettingOutcome::Applied(settings)) => settings,
                Ok(SettingOutcome::Unchanged) => current_settings(state.as_ref(), scope).await,
                Err(e) => {
                    error!(error = %e, %key, "settings update failed");
                    current_settings(state.as_ref(), scope).await
                }
            };

            // The update may have switched the locale, so the evaluator is
            // derived from the post-update settings, never reused.
            let texts = Texts::for_settings(&effective, client_lang.as_deref());
            let field = menu::setting_menu(&texts, &effective, key);
            edit_menu(&bot, chat_id, message_id, &field.title, &field).await?;
        }
    }

    bot.answer_callback_query(q.id).await?;
    Ok(())
}

/// Consumes a plain message as the pending custom value, when the sender
/// is inside the scene.
///
/// Returns `true` when the message was handled here and must not reach the
/// download flow. A reply with no surviving scene state is treated as
/// stale and exits silently.
pub async fn try_consume_scene_text(
    bot: &Bot,
    msg: &Message,
    state: &AppState,
    text: &str,
) -> ResponseResult<bool> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(false);
    };
    let scope = ChatScope(msg.chat.id.0);
    let actor = UserId(user.id.0 as i64);

    if !state.scenes.is_active(scope, actor) {
        return Ok(false);
    }

    match state.membership.is_admin(scope, actor).await {
        Ok(true) => {}
        Ok(false) => return Ok(true),
        Err(e) => {
            error!(error = %e, "membership lookup failed during scene input");
            return Ok(true);
        }
    }

    let Some(input) = state.scenes.take(scope, actor) else {
        debug!("scene state cleared before the reply arrived, exiting");
        return Ok(true);
    };

    let updated = match state
        .resolver
        .settings
        .update(scope, input.setting, text)
        .await
    {
        Ok(updated) => updated,
        Err(e) => {
            error!(error = %e, setting = %input.setting, "custom value update failed");
            None
        }
    };

    let effective = match updated {
        Some(settings) => settings,
        None => current_settings(state, scope).await,
    };
    let texts = Texts::for_settings(&effective, user.language_code.as_deref());
    bot.send_message(msg.chat.id, texts.text("settings.saved"))
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;
    Ok(true)
}

/// Runs the admin gate, answering the callback with a notice on refusal.
async fn gate_admin(
    bot: &Bot,
    q: &CallbackQuery,
    state: &AppState,
    scope: ChatScope,
    actor: UserId,
    client_lang: Option<&str>,
) -> ResponseResult<bool> {
    let allowed = match state.membership.is_admin(scope, actor).await {
        Ok(allowed) => allowed,
        Err(e) => {
            error!(error = %e, "membership lookup failed");
            false
        }
    };
    if !allowed {
        let settings = current_settings(state, scope).await;
        let texts = Texts::for_settings(&settings, client_lang);
        bot.answer_callback_query(q.id.clone())
            .text(texts.text("settings.admin-only"))
            .await?;
    }
    Ok(allowed)
}

async fn current_settings(state: &AppState, scope: ChatScope) -> Settings {
    match state.resolver.settings.get(scope).await {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "settings read failed, using defaults");
            Settings::default()
        }
    }
}

fn message_coords(q: &CallbackQuery) -> Option<(ChatId, MessageId)> {
    q.message.as_ref().map(|m| (m.chat().id, m.id()))
}

async fn edit_menu(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    text: &str,
    menu: &vidra_agent::Menu,
) -> ResponseResult<()> {
    let edit = bot
        .edit_message_text(chat_id, message_id, text)
        .reply_markup(keyboard(menu))
        .await;
    match edit {
        Ok(_) => Ok(()),
        // Double taps land on an already-current menu.
        Err(e) if e.to_string().contains("message is not modified") => Ok(()),
        Err(e) => Err(e),
    }
}
