// SPDX-FileCopyrightText: 2026 Vidra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Download backend trait.

use async_trait::async_trait;

use crate::error::VidraError;
use crate::types::{MediaItem, MediaRequest, OutputFormat, Settings};

/// Turns a (request, output format) pair into deliverable media.
///
/// Implementations may take substantial time; there is no partial-progress
/// callback contract. The orchestration reports status around the call.
#[async_trait]
pub trait Downloader: Send + Sync {
    async fn download(
        &self,
        format: OutputFormat,
        request: &MediaRequest,
        settings: &Settings,
    ) -> Result<Vec<MediaItem>, VidraError>;
}
