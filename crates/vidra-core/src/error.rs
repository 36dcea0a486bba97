// SPDX-FileCopyrightText: 2026 Vidra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Vidra media bot.

use thiserror::Error;

use crate::types::RequestId;

/// The primary error type used across all Vidra collaborator traits and
/// core operations.
#[derive(Debug, Error)]
pub enum VidraError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Channel errors (Telegram API failure, message format, rate limiting).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The submitted reference could not become a media request.
    #[error("unsupported reference: {0}")]
    UnsupportedReference(String),

    /// The download backend failed for a resolved output format.
    #[error("download error: {message}")]
    Download {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A button or chosen result referenced a request the store no longer has.
    #[error("request not found: {id}")]
    RequestNotFound { id: RequestId },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
