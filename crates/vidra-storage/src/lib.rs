// SPDX-FileCopyrightText: 2026 Vidra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Vidra media bot.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a
//! single-writer concurrency model via `tokio-rusqlite`, and typed CRUD
//! operations for requests, per-conversation settings, and download
//! counters. [`SqliteStorage`] implements the core collaborator traits.

pub mod adapter;
pub mod database;
pub mod queries;

pub use adapter::SqliteStorage;
pub use database::Database;
