// SPDX-FileCopyrightText: 2026 Vidra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The admin-gated settings mutation step.
//!
//! Every value change, whether from a menu button or a scene text reply,
//! goes through [`apply_setting`] so the gate and the store call cannot be
//! reordered or skipped by a surface adapter.

use vidra_core::{ChatScope, SettingKey, Settings, UserId, VidraError};

use crate::membership::Membership;

/// Result of one attempted settings mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingOutcome {
    /// The store applied the change; these are the post-update settings.
    Applied(Settings),
    /// The store reported no change; keep displaying the previous values.
    Unchanged,
    /// The actor failed the admin gate; nothing was written.
    Denied,
}

/// Applies one settings value after checking the admin gate.
///
/// The membership lookup runs fresh on every call; group conversations
/// require an administrator, one-to-one conversations always pass.
pub async fn apply_setting(
    membership: &dyn Membership,
    store: &dyn vidra_core::SettingsStore,
    scope: ChatScope,
    actor: UserId,
    key: SettingKey,
    raw: &str,
) -> Result<SettingOutcome, VidraError> {
    if !membership.is_admin(scope, actor).await? {
        return Ok(SettingOutcome::Denied);
    }

    match store.update(scope, key, raw).await? {
        Some(settings) => Ok(SettingOutcome::Applied(settings)),
        None => Ok(SettingOutcome::Unchanged),
    }
}
