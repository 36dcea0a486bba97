// SPDX-FileCopyrightText: 2026 Vidra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scoped free-text capture state for the settings "custom value" flow.
//!
//! While a `SettingInput` exists for a caller, their next plain message is
//! consumed as the value; any button press clears it first. The state is
//! keyed by (conversation, user) so concurrent callers never see each
//! other's scene, and `clear` is idempotent so every exit path may call it.

use dashmap::DashMap;

use vidra_core::{ChatScope, SettingKey, UserId};

/// The setting a caller is currently typing a custom value for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingInput {
    pub setting: SettingKey,
}

/// In-memory scene store.
#[derive(Debug, Default)]
pub struct SceneStore {
    states: DashMap<(ChatScope, UserId), SettingInput>,
}

impl SceneStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters the scene, replacing any previous state for the caller.
    pub fn enter(&self, scope: ChatScope, user: UserId, setting: SettingKey) {
        self.states.insert((scope, user), SettingInput { setting });
    }

    /// Consumes the caller's state. `None` means the state was already
    /// cleared; the text reply is then treated as stale.
    pub fn take(&self, scope: ChatScope, user: UserId) -> Option<SettingInput> {
        self.states.remove(&(scope, user)).map(|(_, state)| state)
    }

    /// Clears without reading. Safe to call on every exit path.
    pub fn clear(&self, scope: ChatScope, user: UserId) {
        self.states.remove(&(scope, user));
    }

    /// Whether the caller currently owes a free-text value.
    pub fn is_active(&self, scope: ChatScope, user: UserId) -> bool {
        self.states.contains_key(&(scope, user))
    }
}
