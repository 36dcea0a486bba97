// SPDX-FileCopyrightText: 2026 Vidra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The output selection protocol.
//!
//! Drives one resolution: chosen format in, downloaded media delivered into
//! the status message, with strictly ordered status edits (downloading →
//! uploading → final delivery or error). Every surface adapter funnels its
//! picker buttons and auto-resolutions through [`Resolver::resolve`].

use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, warn};

use async_trait::async_trait;
use vidra_core::i18n::Texts;
use vidra_core::{
    Downloader, MediaItem, MediaRequest, OutputFormat, RequestId, RequestStore, Settings,
    SettingsStore, StatsStore, UserId, VidraError,
};

use crate::delivery;

/// The status-message handle a resolution renders into.
///
/// Chat surfaces edit a regular message; inline surfaces edit the inline
/// message and send groups to the author's private chat. Implementations
/// must tolerate repeated edits of the same message.
#[async_trait]
pub trait ResolveTarget: Send + Sync {
    async fn edit_text(&self, text: &str) -> Result<(), VidraError>;
    async fn edit_media(&self, item: &MediaItem, caption: &str) -> Result<(), VidraError>;
    async fn send_group(&self, items: &[MediaItem]) -> Result<(), VidraError>;
}

/// Outcome of the ownership check on a picker button press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonAccess {
    /// The actor may resolve; the request may still be absent (expired).
    Allowed(Option<MediaRequest>),
    /// The button belongs to someone else's request.
    NotOwner,
}

/// Shared collaborator handles for the selection protocol.
#[derive(Clone)]
pub struct Resolver {
    pub requests: Arc<dyn RequestStore>,
    pub settings: Arc<dyn SettingsStore>,
    pub stats: Arc<dyn StatsStore>,
    pub downloader: Arc<dyn Downloader>,
}

impl Resolver {
    /// Re-fetches a request and checks the acting user against its author.
    ///
    /// An absent request is allowed through here; [`resolve`] fails fast on
    /// it before touching the downloader.
    ///
    /// [`resolve`]: Resolver::resolve
    pub async fn check_button_owner(
        &self,
        id: &RequestId,
        actor: UserId,
    ) -> Result<ButtonAccess, VidraError> {
        let request = self.requests.get(id).await?;
        match request {
            Some(r) if r.author_id != actor => Ok(ButtonAccess::NotOwner),
            other => Ok(ButtonAccess::Allowed(other)),
        }
    }

    /// Resolves a chosen output format into delivered media.
    ///
    /// Returns `Ok(false)` for user-visible failures already rendered into
    /// the target (expired request, backend failure); `Err` only for
    /// transport errors while rendering. On success the download counter is
    /// incremented on a detached task whose failure never surfaces.
    pub async fn resolve(
        &self,
        format: OutputFormat,
        request: Option<&MediaRequest>,
        settings: &Settings,
        target: &dyn ResolveTarget,
        texts: &Texts,
        actor: UserId,
    ) -> Result<bool, VidraError> {
        // An expired or never-stored request never reaches the backend.
        let Some(request) = request else {
            let detail = texts.text("error.request-not-found");
            target
                .edit_text(&texts.text_with("download.error", &[("message", &detail)]))
                .await?;
            return Ok(false);
        };

        target
            .edit_text(&texts.text("download.downloading"))
            .await?;

        let items = match self.downloader.download(format, request, settings).await {
            Ok(items) if items.is_empty() => Err(VidraError::Download {
                message: "backend produced no media".into(),
                source: None,
            }),
            other => other,
        };

        let items = match items {
            Ok(items) => items,
            Err(err) => {
                warn!(
                    request_id = %request.id,
                    %format,
                    error = %err,
                    "download failed"
                );
                target
                    .edit_text(&texts.text_with("download.error", &[("message", &texts.error(&err))]))
                    .await?;
                return Ok(false);
            }
        };

        target.edit_text(&texts.text("download.uploading")).await?;
        delivery::deliver(&items, request, settings, target, texts).await?;

        metrics::counter!("vidra_downloads_total").increment(1);

        // Best-effort counter; the resolution result never depends on it.
        let stats = Arc::clone(&self.stats);
        tokio::spawn(async move {
            if let Err(e) = stats.record_download(actor).await {
                debug!(error = %e, "download counter increment failed");
            }
        });

        Ok(true)
    }
}

/// The format a surface should auto-resolve with, if any.
///
/// A configured preference always wins; non-private surfaces fall back to
/// `auto` instead of waiting for a tap. Free-text preferences that do not
/// name a known format degrade to `auto`.
pub fn auto_format(settings: &Settings, private: bool) -> Option<OutputFormat> {
    match settings.preferred_output.as_deref() {
        Some(preferred) => {
            Some(OutputFormat::from_str(preferred).unwrap_or(OutputFormat::Auto))
        }
        None if !private => Some(OutputFormat::Auto),
        None => None,
    }
}


#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::testing::{RecordingTarget, TargetCall};
    use super::*;
    use vidra_core::{ChatScope, MediaKind, SettingKey};

    struct StaticRequests(Option<MediaRequest>);

    #[async_trait]
    impl RequestStore for StaticRequests {
        async fn create(&self, _url: &str, _author: UserId) -> Result<MediaRequest, VidraError> {
            unreachable!("not used in these tests")
        }

        async fn get(&self, _id: &RequestId) -> Result<Option<MediaRequest>, VidraError> {
            Ok(self.0.clone())
        }
    }

    struct NoSettings;

    #[async_trait]
    impl SettingsStore for NoSettings {
        async fn get(&self, _scope: ChatScope) -> Result<Settings, VidraError> {
            Ok(Settings::default())
        }

        async fn update(
            &self,
            _scope: ChatScope,
            _key: SettingKey,
            _value: &str,
        ) -> Result<Option<Settings>, VidraError> {
            Ok(None)
        }
    }

    #[derive(Default)]
    struct CountingStats {
        increments: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl StatsStore for CountingStats {
        async fn record_download(&self, _user: UserId) -> Result<(), VidraError> {
            if self.fail {
                return Err(VidraError::Internal("counter down".into()));
            }
            self.increments.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct ScriptedDownloader {
        result: Mutex<Option<Result<Vec<MediaItem>, VidraError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedDownloader {
        fn ok(items: Vec<MediaItem>) -> Self {
            Self {
                result: Mutex::new(Some(Ok(items))),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                result: Mutex::new(Some(Err(VidraError::Download {
                    message: "no formats found".into(),
                    source: None,
                }))),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Downloader for ScriptedDownloader {
        async fn download(
            &self,
            _format: OutputFormat,
            _request: &MediaRequest,
            _settings: &Settings,
        ) -> Result<Vec<MediaItem>, VidraError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.lock().expect("lock").take().expect("scripted")
        }
    }

    fn request() -> MediaRequest {
        MediaRequest {
            id: RequestId("r1".into()),
            url: "https://example.com/a".into(),
            author_id: UserId(1),
            created_at: "2026-01-01T00:00:00Z".into(),
        }
    }

    fn item() -> MediaItem {
        MediaItem::from_url(
            MediaKind::Video,
            "https://example.com/v.mp4".parse().expect("url"),
        )
    }

    fn resolver(downloader: ScriptedDownloader, stats: Arc<CountingStats>) -> Resolver {
        Resolver {
            requests: Arc::new(StaticRequests(None)),
            settings: Arc::new(NoSettings),
            stats,
            downloader: Arc::new(downloader),
        }
    }

    fn texts() -> Texts {
        Texts::for_language_code(Some("en"))
    }

    #[tokio::test]
    async fn successful_resolution_orders_status_edits() {
        let stats = Arc::new(CountingStats::default());
        let resolver = resolver(ScriptedDownloader::ok(vec![item()]), stats.clone());
        let target = RecordingTarget::new();

        let ok = resolver
            .resolve(
                OutputFormat::Auto,
                Some(&request()),
                &Settings::default(),
                &target,
                &texts(),
                UserId(1),
            )
            .await
            .expect("resolution");
        assert!(ok);

        let calls = target.calls();
        assert!(matches!(&calls[0], TargetCall::EditText(t) if t == "Downloading…"));
        assert!(matches!(&calls[1], TargetCall::EditText(t) if t == "Uploading…"));
        assert!(matches!(&calls[2], TargetCall::EditMedia { .. }));
        assert_eq!(calls.len(), 3);

        // The detached counter task lands shortly after.
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert_eq!(stats.increments.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn download_failure_renders_error_and_returns_false() {
        let stats = Arc::new(CountingStats::default());
        let resolver = resolver(ScriptedDownloader::failing(), stats.clone());
        let target = RecordingTarget::new();

        let ok = resolver
            .resolve(
                OutputFormat::Audio,
                Some(&request()),
                &Settings::default(),
                &target,
                &texts(),
                UserId(1),
            )
            .await
            .expect("handled failure");
        assert!(!ok);

        let calls = target.calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(&calls[1], TargetCall::EditText(t) if t.contains("no formats found")));

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert_eq!(stats.increments.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn absent_request_short_circuits_before_the_backend() {
        let stats = Arc::new(CountingStats::default());
        let downloader = ScriptedDownloader::ok(vec![item()]);
        let resolver = Resolver {
            requests: Arc::new(StaticRequests(None)),
            settings: Arc::new(NoSettings),
            stats,
            downloader: Arc::new(downloader),
        };
        let target = RecordingTarget::new();

        let ok = resolver
            .resolve(
                OutputFormat::Auto,
                None,
                &Settings::default(),
                &target,
                &texts(),
                UserId(1),
            )
            .await
            .expect("handled");
        assert!(!ok);

        let calls = target.calls();
        assert_eq!(calls.len(), 1);
        assert!(matches!(&calls[0], TargetCall::EditText(t) if t.contains("expired")));

        let backend = resolver
            .downloader
            .download(
                OutputFormat::Auto,
                &request(),
                &Settings::default(),
            )
            .await;
        // The scripted result is still unconsumed, proving no backend call.
        assert!(backend.is_ok());
    }

    #[tokio::test]
    async fn empty_backend_result_is_a_failure() {
        let stats = Arc::new(CountingStats::default());
        let resolver = resolver(ScriptedDownloader::ok(vec![]), stats);
        let target = RecordingTarget::new();

        let ok = resolver
            .resolve(
                OutputFormat::Auto,
                Some(&request()),
                &Settings::default(),
                &target,
                &texts(),
                UserId(1),
            )
            .await
            .expect("handled");
        assert!(!ok);
    }

    #[tokio::test]
    async fn stats_failure_never_affects_the_result() {
        let stats = Arc::new(CountingStats {
            increments: AtomicUsize::new(0),
            fail: true,
        });
        let resolver = resolver(ScriptedDownloader::ok(vec![item()]), stats);
        let target = RecordingTarget::new();

        let ok = resolver
            .resolve(
                OutputFormat::Auto,
                Some(&request()),
                &Settings::default(),
                &target,
                &texts(),
                UserId(1),
            )
            .await
            .expect("resolution");
        assert!(ok);
    }

    #[tokio::test]
    async fn button_owner_check_blocks_foreign_actors() {
        let resolver = Resolver {
            requests: Arc::new(StaticRequests(Some(request()))),
            settings: Arc::new(NoSettings),
            stats: Arc::new(CountingStats::default()),
            downloader: Arc::new(ScriptedDownloader::ok(vec![])),
        };

        let access = resolver
            .check_button_owner(&RequestId("r1".into()), UserId(2))
            .await
            .expect("check");
        assert_eq!(access, ButtonAccess::NotOwner);

        let access = resolver
            .check_button_owner(&RequestId("r1".into()), UserId(1))
            .await
            .expect("check");
        assert_eq!(access, ButtonAccess::Allowed(Some(request())));
    }

    #[tokio::test]
    async fn button_owner_check_allows_absent_requests_through() {
        let resolver = Resolver {
            requests: Arc::new(StaticRequests(None)),
            settings: Arc::new(NoSettings),
            stats: Arc::new(CountingStats::default()),
            downloader: Arc::new(ScriptedDownloader::ok(vec![])),
        };

        let access = resolver
            .check_button_owner(&RequestId("gone".into()), UserId(2))
            .await
            .expect("check");
        assert_eq!(access, ButtonAccess::Allowed(None));
    }

    #[test]
    fn auto_format_policy() {
        let mut settings = Settings::default();

        // Private chat with no preference waits for a tap.
        assert_eq!(auto_format(&settings, true), None);
        // Groups fall back to auto.
        assert_eq!(auto_format(&settings, false), Some(OutputFormat::Auto));

        settings.preferred_output = Some("audio".into());
        assert_eq!(auto_format(&settings, true), Some(OutputFormat::Audio));
        assert_eq!(auto_format(&settings, false), Some(OutputFormat::Audio));

        // Unknown free-text preferences degrade to auto rather than stall.
        settings.preferred_output = Some("mp3-320k".into());
        assert_eq!(auto_format(&settings, true), Some(OutputFormat::Auto));
    }
}
