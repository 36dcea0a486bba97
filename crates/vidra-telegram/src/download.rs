// SPDX-FileCopyrightText: 2026 Vidra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The four download surfaces: message, inline query, callback button,
//! and chosen inline result.
//!
//! Each handler normalizes its update into (scope, actor, locale), then
//! drives the selection protocol from `vidra-agent`. Creation errors are
//! only voiced in private chats; group chats produce too many false
//! triggers to warrant noise.

use std::sync::Arc;
use std::time::Duration;

use teloxide::prelude::*;
use teloxide::types::{
    ChatKind, InlineQuery, InlineQueryResult, InlineQueryResultArticle, InlineQueryResultsButton,
    InlineQueryResultsButtonKind, InputMessageContent, InputMessageContentText, MessageEntityKind,
    MessageId, ReplyParameters,
};
use tracing::{debug, error, warn};

use vidra_agent::resolve::auto_format;
use vidra_agent::{ButtonAccess, CallbackPayload, menu};
use vidra_core::i18n::Texts;
use vidra_core::{ChatScope, MediaRequest, OutputFormat, RequestId, Settings, UserId};

use crate::target::{InlineTarget, MessageTarget};
use crate::{AppState, keyboard, settings};

/// Entry point for plain chat messages.
pub async fn handle_message(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(user) = msg.from.clone() else {
        // Channel posts carry no actionable sender.
        return Ok(());
    };
    let Some(text) = msg.text().map(str::to_string) else {
        return Ok(());
    };

    metrics::counter!("vidra_updates_total", "surface" => "message").increment(1);

    // A pending custom-value scene owns this caller's next message.
    if settings::try_consume_scene_text(&bot, &msg, state.as_ref(), &text).await? {
        return Ok(());
    }

    let client_lang = user.language_code.clone();

    if let Some(arg) = command_arg(&text, "/start") {
        if arg == "settings" {
            settings::send_settings_menu(
                &bot,
                msg.chat.id,
                Some(msg.id),
                state.as_ref(),
                client_lang.as_deref(),
            )
            .await?;
        } else {
            let settings = current_settings(state.as_ref(), ChatScope(msg.chat.id.0)).await;
            let texts = Texts::for_settings(&settings, client_lang.as_deref());
            bot.send_message(msg.chat.id, texts.text("start.greeting"))
                .await?;
        }
        return Ok(());
    }

    if command_arg(&text, "/settings").is_some() {
        settings::send_settings_menu(
            &bot,
            msg.chat.id,
            Some(msg.id),
            state.as_ref(),
            client_lang.as_deref(),
        )
        .await?;
        return Ok(());
    }

    if text.trim() == "meow" {
        let settings = current_settings(state.as_ref(), ChatScope(msg.chat.id.0)).await;
        let texts = Texts::for_settings(&settings, client_lang.as_deref());
        bot.send_message(msg.chat.id, texts.text("easteregg.meow"))
            .reply_parameters(ReplyParameters::new(msg.id))
            .await?;
        return Ok(());
    }

    for reference in extract_references(&msg, &text) {
        process_reference(&bot, &msg, state.as_ref(), &user, &reference).await?;
    }
    Ok(())
}

/// One reference from a message: create the request, render the picker,
/// and apply the auto-resolution policy.
async fn process_reference(
    bot: &Bot,
    msg: &Message,
    state: &AppState,
    user: &teloxide::types::User,
    reference: &str,
) -> ResponseResult<()> {
    let scope = ChatScope(msg.chat.id.0);
    let actor = UserId(user.id.0 as i64);
    let private = matches!(msg.chat.kind, ChatKind::Private(_));

    let settings = current_settings(state, scope).await;
    let texts = Texts::for_settings(&settings, user.language_code.as_deref());

    let request = match state.resolver.requests.create(reference, actor).await {
        Ok(request) => request,
        Err(err) => {
            debug!(error = %err, reference, "request creation rejected");
            if private {
                bot.send_message(
                    msg.chat.id,
                    texts.text_with("download.error", &[("message", &texts.error(&err))]),
                )
                .reply_parameters(ReplyParameters::new(msg.id))
                .await?;
            }
            return Ok(());
        }
    };
    metrics::counter!("vidra_requests_total", "surface" => "message").increment(1);

    let picker = menu::selection_menu(&texts, &request.id);
    let reply = bot
        .send_message(msg.chat.id, picker.title.clone())
        .reply_markup(keyboard(&picker))
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;

    // A configured preference, or any non-private surface, skips the tap.
    if let Some(format) = auto_format(&settings, private) {
        let target = MessageTarget {
            bot: bot.clone(),
            chat_id: msg.chat.id,
            message_id: reply.id,
        };
        run_resolution(
            state,
            format,
            Some(&request),
            &settings,
            &target,
            &texts,
            actor,
            (!private).then_some((bot.clone(), msg.chat.id, reply.id)),
        )
        .await;
    }
    Ok(())
}

/// Entry point for inline queries.
pub async fn handle_inline_query(
    bot: Bot,
    q: InlineQuery,
    state: Arc<AppState>,
) -> ResponseResult<()> {
    metrics::counter!("vidra_updates_total", "surface" => "inline_query").increment(1);

    let actor = UserId(q.from.id.0 as i64);
    // Inline answers land wherever the user pastes them; settings follow
    // the author's private scope.
    let scope = ChatScope(actor.0);
    let settings = current_settings(state.as_ref(), scope).await;
    let texts = Texts::for_settings(&settings, q.from.language_code.as_deref());

    let pm_button = InlineQueryResultsButton {
        text: texts.text("settings.open"),
        kind: InlineQueryResultsButtonKind::StartParameter("settings".to_string()),
    };

    let query = q.query.trim().to_string();
    if query.is_empty() {
        let mut answer = bot.answer_inline_query(q.id.clone(), Vec::<InlineQueryResult>::new());
        answer.cache_time = Some(0);
        answer.is_personal = Some(true);
        answer.button = Some(pm_button);
        answer.await?;
        return Ok(());
    }

    let results = match state.resolver.requests.create(&query, actor).await {
        Ok(request) => {
            metrics::counter!("vidra_requests_total", "surface" => "inline_query").increment(1);
            let picker = menu::selection_menu(&texts, &request.id);
            let content =
                InputMessageContent::Text(InputMessageContentText::new(picker.title.as_str()));
            let article = InlineQueryResultArticle::new(
                request.id.0.clone(),
                picker.title.as_str(),
                content,
            )
            .reply_markup(keyboard(&picker));
            vec![InlineQueryResult::Article(article)]
        }
        Err(err) => {
            debug!(error = %err, query, "inline request creation rejected");
            let detail = texts.error(&err);
            let content =
                InputMessageContent::Text(InputMessageContentText::new(detail.as_str()));
            let article = InlineQueryResultArticle::new(
                uuid::Uuid::new_v4().simple().to_string(),
                texts.text("download.error-title"),
                content,
            )
            .description(detail.clone());
            vec![InlineQueryResult::Article(article)]
        }
    };

    let mut answer = bot.answer_inline_query(q.id.clone(), results);
    answer.cache_time = Some(0);
    answer.is_personal = Some(true);
    answer.button = Some(pm_button);
    answer.await?;
    Ok(())
}

/// Entry point for chosen inline results.
///
/// The acknowledgement only carries an editable message when the client
/// attached one; without it there is nothing to resolve into.
pub async fn handle_chosen_inline_result(
    bot: Bot,
    chosen: teloxide::types::ChosenInlineResult,
    state: Arc<AppState>,
) -> ResponseResult<()> {
    metrics::counter!("vidra_updates_total", "surface" => "chosen_result").increment(1);

    let Some(inline_message_id) = chosen.inline_message_id else {
        return Ok(());
    };

    let actor = UserId(chosen.from.id.0 as i64);
    let scope = ChatScope(actor.0);
    let settings = current_settings(state.as_ref(), scope).await;

    // Without a preference the picker stays up waiting for a tap.
    let Some(format) = auto_format(&settings, true) else {
        return Ok(());
    };

    let texts = Texts::for_settings(&settings, chosen.from.language_code.as_deref());
    let request = fetch_request(state.as_ref(), &RequestId(chosen.result_id.clone())).await;

    let target = InlineTarget {
        bot,
        inline_message_id,
        group_chat_id: ChatId(actor.0),
    };
    run_resolution(
        state.as_ref(),
        format,
        request.as_ref(),
        &settings,
        &target,
        &texts,
        actor,
        None,
    )
    .await;
    Ok(())
}

/// Entry point for callback buttons across all menus.
pub async fn handle_callback_query(
    bot: Bot,
    q: CallbackQuery,
    state: Arc<AppState>,
) -> ResponseResult<()> {
    metrics::counter!("vidra_updates_total", "surface" => "callback").increment(1);

    let actor = UserId(q.from.id.0 as i64);
    let scope = q
        .message
        .as_ref()
        .map(|m| ChatScope(m.chat().id.0))
        .unwrap_or(ChatScope(actor.0));

    // Any button press while a custom-value scene is open abandons the
    // scene; the press itself is then handled by whoever owns it.
    state.scenes.clear(scope, actor);

    let Some(payload) = q.data.as_deref().and_then(CallbackPayload::parse) else {
        // Not our grammar; just stop the client spinner.
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    };

    match payload {
        CallbackPayload::Output { request, format } => {
            handle_output_button(bot, q, state, request, format).await
        }
        CallbackPayload::OpenSetting { key } => {
            settings::handle_open_setting(bot, q, state, key).await
        }
        CallbackPayload::Back => settings::handle_back(bot, q, state).await,
        CallbackPayload::SetValue { key, index } => {
            settings::handle_set_value(bot, q, state, key, index).await
        }
    }
}

/// A picker button press: ownership check, then resolution into whichever
/// message the button is attached to.
async fn handle_output_button(
    bot: Bot,
    q: CallbackQuery,
    state: Arc<AppState>,
    request_id: RequestId,
    format: OutputFormat,
) -> ResponseResult<()> {
    let actor = UserId(q.from.id.0 as i64);
    let (scope, private) = match q.message.as_ref() {
        Some(m) => (
            ChatScope(m.chat().id.0),
            matches!(m.chat().kind, ChatKind::Private(_)),
        ),
        None => (ChatScope(actor.0), true),
    };

    let settings = current_settings(state.as_ref(), scope).await;
    let texts = Texts::for_settings(&settings, q.from.language_code.as_deref());

    match state.resolver.check_button_owner(&request_id, actor).await {
        Ok(ButtonAccess::Allowed(request)) => {
            bot.answer_callback_query(q.id.clone()).await?;

            if let Some(m) = q.message.as_ref() {
                let chat_id = m.chat().id;
                let message_id = m.id();
                let target = MessageTarget {
                    bot: bot.clone(),
                    chat_id,
                    message_id,
                };
                run_resolution(
                    state.as_ref(),
                    format,
                    request.as_ref(),
                    &settings,
                    &target,
                    &texts,
                    actor,
                    (!private).then_some((bot.clone(), chat_id, message_id)),
                )
                .await;
            } else if let Some(inline_message_id) = q.inline_message_id.clone() {
                let target = InlineTarget {
                    bot: bot.clone(),
                    inline_message_id,
                    group_chat_id: ChatId(actor.0),
                };
                run_resolution(
                    state.as_ref(),
                    format,
                    request.as_ref(),
                    &settings,
                    &target,
                    &texts,
                    actor,
                    None,
                )
                .await;
            }
        }
        Ok(ButtonAccess::NotOwner) => {
            bot.answer_callback_query(q.id.clone())
                .text(texts.text("download.not-button-owner"))
                .await?;
        }
        Err(e) => {
            error!(error = %e, request_id = %request_id, "ownership check failed");
            bot.answer_callback_query(q.id.clone())
                .text(texts.error(&e))
                .await?;
        }
    }
    Ok(())
}

/// Drives one resolution and, on user-visible failure in a shared chat,
/// registers the delayed cleanup of the error status message.
#[allow(clippy::too_many_arguments)]
async fn run_resolution(
    state: &AppState,
    format: OutputFormat,
    request: Option<&MediaRequest>,
    settings: &Settings,
    target: &dyn vidra_agent::ResolveTarget,
    texts: &Texts,
    actor: UserId,
    cleanup: Option<(Bot, ChatId, MessageId)>,
) {
    match state
        .resolver
        .resolve(format, request, settings, target, texts, actor)
        .await
    {
        Ok(true) => {}
        Ok(false) => {
            if let Some((bot, chat_id, message_id)) = cleanup {
                schedule_error_cleanup(bot, chat_id, message_id, state.error_delete_secs);
            }
        }
        Err(e) => {
            // Rendering into the status message failed; there is nowhere
            // left to surface this besides the log.
            error!(error = %e, "resolution aborted by transport failure");
        }
    }
}

/// Deletes an error status message after a fixed delay.
///
/// Detached on purpose: the handler finishes immediately and neither the
/// timer nor a failed delete is ever observed by it.
fn schedule_error_cleanup(bot: Bot, chat_id: ChatId, message_id: MessageId, delay_secs: u64) {
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        if let Err(e) = bot.delete_message(chat_id, message_id).await {
            debug!(error = %e, chat_id = chat_id.0, "delayed status cleanup failed");
        }
    });
}

async fn fetch_request(state: &AppState, id: &RequestId) -> Option<MediaRequest> {
    match state.resolver.requests.get(id).await {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, request_id = %id, "request lookup failed");
            None
        }
    }
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

/// Extracts the references from a message: URL entities when present,
/// otherwise the raw text as a single candidate.
fn extract_references(msg: &Message, text: &str) -> Vec<String> {
    let mut urls = Vec::new();
    if let Some(entities) = msg.parse_entities() {
        for entity in &entities {
            match entity.kind() {
                MessageEntityKind::Url => urls.push(entity.text().to_string()),
                MessageEntityKind::TextLink { url } => urls.push(url.to_string()),
                _ => {}
            }
        }
    }
    if urls.is_empty() {
        vec![text.trim().to_string()]
    } else {
        urls
    }
}

/// Matches `/cmd`, `/cmd@botname`, and their argument forms.
fn command_arg<'a>(text: &'a str, command: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(command)?;
    let rest = match rest.strip_prefix('@') {
        Some(with_bot) => match with_bot.split_once(' ') {
            Some((_bot, arg)) => return Some(arg.trim()),
            None => return Some(""),
        },
        None => rest,
    };
    if rest.is_empty() {
        Some("")
    } else if rest.starts_with(' ') {
        Some(rest.trim())
    } else {
        None
    }
}
