// SPDX-FileCopyrightText: 2026 Vidra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Orchestration core of the Vidra media bot.
//!
//! Four Telegram surfaces (message, inline query, callback button, chosen
//! inline result) all funnel into the same request → selection → delivery
//! flow implemented here, channel-agnostic and driven through the
//! collaborator traits from `vidra-core`:
//!
//! - [`resolve::Resolver`] turns a chosen output format into downloaded
//!   media and drives status edits on a [`resolve::ResolveTarget`].
//! - [`delivery`] chunks outbound media against the platform batch limit.
//! - [`menu`] builds the format picker and the settings menus.
//! - [`settings_flow`] is the admin-gated settings mutation step.
//! - [`scene`] holds the per-caller free-text capture state.
//! - [`callback`] is the button payload grammar shared by all of the above.

pub mod callback;
pub mod delivery;
pub mod membership;
pub mod menu;
pub mod resolve;
pub mod scene;
pub mod settings_flow;

pub use callback::CallbackPayload;
pub use membership::Membership;
pub use menu::{Menu, MenuButton};
pub use resolve::{ButtonAccess, ResolveTarget, Resolver};
pub use scene::{SceneStore, SettingInput};
pub use settings_flow::{SettingOutcome, apply_setting};
