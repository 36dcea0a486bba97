// SPDX-FileCopyrightText: 2026 Vidra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reference HTTP download backend.
//!
//! Probes the reference URL, classifies the payload from its content type,
//! and returns a single URL-sourced [`MediaItem`] that Telegram fetches
//! itself. This is deliberately the minimal [`Downloader`]; site-specific
//! extractor backends implement the same trait.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use vidra_config::model::DownloadConfig;
use vidra_core::{
    Downloader, MediaItem, MediaKind, MediaRequest, OutputFormat, Settings, VidraError,
};

/// Downloader that serves direct-file URLs.
pub struct HttpDownloader {
    client: reqwest::Client,
    max_file_bytes: u64,
}

impl HttpDownloader {
    pub fn new(config: &DownloadConfig) -> Result<Self, VidraError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| VidraError::Download {
                message: "failed to build HTTP client".into(),
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            client,
            max_file_bytes: config.max_file_bytes,
        })
    }

    /// Probes the URL with HEAD, falling back to GET for servers that
    /// reject HEAD. Only the headers are inspected; the body is dropped.
    async fn probe(&self, url: &str) -> Result<reqwest::Response, VidraError> {
        let head = self.client.head(url).send().await;
        match head {
            Ok(resp) if resp.status() != StatusCode::METHOD_NOT_ALLOWED => Ok(resp),
            _ => {
                debug!(url, "HEAD probe failed, retrying as GET");
                self.client
                    .get(url)
                    .send()
                    .await
                    .map_err(|e| VidraError::Download {
                        message: format!("could not reach {url}"),
                        source: Some(Box::new(e)),
                    })
            }
        }
    }
}

/// Maps a Content-Type to the media kind Telegram should receive.
pub fn classify_content_type(content_type: &str) -> MediaKind {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.split_once('/') {
        Some(("image", _)) => MediaKind::Photo,
        Some(("video", _)) => MediaKind::Video,
        Some(("audio", _)) => MediaKind::Audio,
        _ => MediaKind::Document,
    }
}

/// Checks a requested format against the classified kind.
///
/// `Auto` accepts anything; `Audio`/`Video` require a matching payload
/// since this backend does no transcoding.
fn admit_format(format: OutputFormat, kind: MediaKind) -> Result<MediaKind, VidraError> {
    match (format, kind) {
        (OutputFormat::Auto, kind) => Ok(kind),
        (OutputFormat::Audio, MediaKind::Audio) => Ok(MediaKind::Audio),
        (OutputFormat::Video, MediaKind::Video) => Ok(MediaKind::Video),
        (format, kind) => Err(VidraError::Download {
            message: format!("{format} requested but the link serves {kind}"),
            source: None,
        }),
    }
}

fn file_name_from_url(url: &url::Url) -> Option<String> {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl Downloader for HttpDownloader {
    async fn download(
        &self,
        format: OutputFormat,
        request: &MediaRequest,
        _settings: &Settings,
    ) -> Result<Vec<MediaItem>, VidraError> {
        let response = self.probe(&request.url).await?;

        if !response.status().is_success() {
            return Err(VidraError::Download {
                message: format!("{} answered {}", request.url, response.status()),
                source: None,
            });
        }

        if let Some(length) = response.content_length()
            && length > self.max_file_bytes
        {
            return Err(VidraError::Download {
                message: format!("file is too large ({length} bytes)"),
                source: None,
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream");
        let kind = admit_format(format, classify_content_type(content_type))?;

        let final_url = response.url().clone();
        let mut item = MediaItem::from_url(kind, final_url.clone());
        item.file_name = file_name_from_url(&final_url);

        debug!(
            request_id = %request.id,
            %kind,
            content_type,
            "classified reference"
        );
        Ok(vec![item])
    }
}
