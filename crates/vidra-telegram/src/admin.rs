// SPDX-FileCopyrightText: 2026 Vidra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Admin gate backed by the Bot API membership lookup.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::ChatMemberKind;

use vidra_agent::Membership;
use vidra_core::{ChatScope, UserId, VidraError};

/// Looks up chat membership live on every check; results are authoritative
/// for the current transition only and never cached.
pub struct TelegramMembership {
    pub bot: Bot,
}

#[async_trait]
impl Membership for TelegramMembership {
    async fn is_admin(&self, scope: ChatScope, user: UserId) -> Result<bool, VidraError> {
        // Private chats have a single member; the gate always passes.
        if scope.0 >= 0 {
            return Ok(true);
        }

        let member = self
            .bot
            .get_chat_member(ChatId(scope.0), teloxide::types::UserId(user.0 as u64))
            .await
            .map_err(|e| VidraError::Channel {
                message: format!("membership lookup failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(matches!(
            member.kind,
            ChatMemberKind::Owner(_) | ChatMemberKind::Administrator(_)
        ))
    }
}
