// SPDX-FileCopyrightText: 2026 Vidra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request persistence and download-counter traits.

use async_trait::async_trait;

use crate::error::VidraError;
use crate::types::{MediaRequest, RequestId, UserId};

/// Store for [`MediaRequest`] records.
///
/// Requests are created once per submitted reference and are immutable
/// afterwards. Lookup by id is the only read path.
#[async_trait]
pub trait RequestStore: Send + Sync {
    /// Persists a new request for the given reference and submitter.
    ///
    /// Rejects references that cannot become a request (malformed URL)
    /// with [`VidraError::UnsupportedReference`].
    async fn create(&self, url: &str, author: UserId) -> Result<MediaRequest, VidraError>;

    /// Looks up a request by id. Absent is a valid, non-exceptional outcome
    /// (the store may have expired the entry).
    async fn get(&self, id: &RequestId) -> Result<Option<MediaRequest>, VidraError>;
}

/// Best-effort usage counters.
#[async_trait]
pub trait StatsStore: Send + Sync {
    /// Increments the download counter for the acting user.
    async fn record_download(&self, user: UserId) -> Result<(), VidraError>;
}
