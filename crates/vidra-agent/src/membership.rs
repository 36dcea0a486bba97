// SPDX-FileCopyrightText: 2026 Vidra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation membership lookup.

use async_trait::async_trait;

use vidra_core::{ChatScope, UserId, VidraError};

/// Answers whether a user may mutate a conversation's settings.
///
/// One-to-one conversations always pass. The result is authoritative for
/// the current transition only and is never cached across calls.
#[async_trait]
pub trait Membership: Send + Sync {
    async fn is_admin(&self, scope: ChatScope, user: UserId) -> Result<bool, VidraError>;
}
