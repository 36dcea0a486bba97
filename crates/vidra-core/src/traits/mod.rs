// SPDX-FileCopyrightText: 2026 Vidra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions for the Vidra orchestration core.
//!
//! The core never talks to SQLite, the network, or the download backend
//! directly. Every external collaborator is reached through one of these
//! traits, using `#[async_trait]` for dynamic dispatch compatibility.

pub mod download;
pub mod settings;
pub mod store;

// Re-export all traits at the traits module level for convenience.
pub use download::Downloader;
pub use settings::SettingsStore;
pub use store::{RequestStore, StatsStore};
