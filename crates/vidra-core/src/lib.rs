// SPDX-FileCopyrightText: 2026 Vidra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Vidra media bot.
//!
//! This crate provides the foundational error type, domain types, i18n
//! message tables, and the collaborator traits (request store, settings
//! store, download backend) the rest of the workspace implements.

pub mod error;
pub mod i18n;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::VidraError;
pub use types::{
    ChatScope, MediaItem, MediaKind, MediaRequest, MediaSource, OutputFormat, RequestId,
    SettingKey, Settings, UserId,
};

// Re-export all collaborator traits at crate root.
pub use traits::{Downloader, RequestStore, SettingsStore, StatsStore};
