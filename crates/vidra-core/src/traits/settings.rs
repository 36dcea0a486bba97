// SPDX-FileCopyrightText: 2026 Vidra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-conversation settings store trait.

use async_trait::async_trait;

use crate::error::VidraError;
use crate::types::{ChatScope, SettingKey, Settings};

/// Store for per-conversation [`Settings`].
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Returns the settings for a conversation, defaults when none stored.
    async fn get(&self, scope: ChatScope) -> Result<Settings, VidraError>;

    /// Applies one field update and returns the post-update settings.
    ///
    /// `None` means no change was applied; callers must fall back to the
    /// pre-update value for display.
    async fn update(
        &self,
        scope: ChatScope,
        key: SettingKey,
        value: &str,
    ) -> Result<Option<Settings>, VidraError>;
}
