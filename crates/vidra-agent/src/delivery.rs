// SPDX-FileCopyrightText: 2026 Vidra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound media delivery against platform batch limits.

use vidra_core::i18n::Texts;
use vidra_core::{MediaItem, MediaRequest, Settings, VidraError};

use crate::resolve::ResolveTarget;

/// Telegram's media group ceiling. Chunks are sized before the transport
/// call; the transport never splits.
pub const MEDIA_GROUP_LIMIT: usize = 10;

/// Delivers downloaded media into the status message.
///
/// A single item replaces the status text in place, captioned with the
/// request URL when attribution is enabled. Multiple items turn the status
/// into a heads-up note followed by sequential media-group sends in input
/// order; a failing chunk propagates and later chunks are not sent
/// (user-visible partial delivery is accepted).
pub async fn deliver(
    items: &[MediaItem],
    request: &MediaRequest,
    settings: &Settings,
    target: &dyn ResolveTarget,
    texts: &Texts,
) -> Result<(), VidraError> {
    if let [single] = items {
        let caption = if settings.preferred_attribution {
            request.url.as_str()
        } else {
            ""
        };
        return target.edit_media(single, caption).await;
    }

    target.edit_text(&texts.text("download.note-many")).await?;
    for chunk in items.chunks(MEDIA_GROUP_LIMIT) {
        target.send_group(chunk).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::testing::{RecordingTarget, TargetCall};
    use vidra_core::{MediaKind, RequestId, UserId};

    fn request() -> MediaRequest {
        MediaRequest {
            id: RequestId("r1".into()),
            url: "https://example.com/a".into(),
            author_id: UserId(1),
            created_at: "2026-01-01T00:00:00Z".into(),
        }
    }

    fn item(n: usize) -> MediaItem {
        MediaItem::from_url(
            MediaKind::Photo,
            format!("https://example.com/{n}").parse().expect("url"),
        )
    }

    fn items(n: usize) -> Vec<MediaItem> {
        (0..n).map(item).collect()
    }

    #[tokio::test]
    async fn single_item_is_edited_with_attribution_caption() {
        let target = RecordingTarget::new();
        let settings = Settings {
            preferred_attribution: true,
            ..Settings::default()
        };

        deliver(
            &items(1),
            &request(),
            &settings,
            &target,
            &Texts::for_language_code(None),
        )
        .await
        .expect("delivery");

        let calls = target.calls();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            TargetCall::EditMedia { caption, .. } => {
                assert_eq!(caption, "https://example.com/a");
            }
            other => panic!("unexpected call {other:?}"),
        }
    }

    #[tokio::test]
    async fn single_item_caption_is_empty_without_attribution() {
        let target = RecordingTarget::new();

        deliver(
            &items(1),
            &request(),
            &Settings::default(),
            &target,
            &Texts::for_language_code(None),
        )
        .await
        .expect("delivery");

        match &target.calls()[0] {
            TargetCall::EditMedia { caption, .. } => assert!(caption.is_empty()),
            other => panic!("unexpected call {other:?}"),
        }
    }

    #[tokio::test]
    async fn chunk_count_is_ceil_n_over_10_and_order_is_preserved() {
        for (n, expected_chunks) in [(2, 1), (10, 1), (11, 2), (25, 3)] {
            let target = RecordingTarget::new();
            let all = items(n);

            deliver(
                &all,
                &request(),
                &Settings::default(),
                &target,
                &Texts::for_language_code(None),
            )
            .await
            .expect("delivery");

            let calls = target.calls();
            // First call is the heads-up note edit.
            assert!(matches!(&calls[0], TargetCall::EditText(_)));

            let chunks: Vec<&Vec<MediaItem>> = calls
                .iter()
                .filter_map(|c| match c {
                    TargetCall::SendGroup(items) => Some(items),
                    _ => None,
                })
                .collect();
            assert_eq!(chunks.len(), expected_chunks, "n = {n}");
            assert!(chunks.iter().all(|c| c.len() <= MEDIA_GROUP_LIMIT));

            // Concatenation reproduces the input exactly.
            let rejoined: Vec<MediaItem> =
                chunks.into_iter().flat_map(|c| c.iter().cloned()).collect();
            assert_eq!(rejoined, all, "n = {n}");
        }
    }

    #[tokio::test]
    async fn failing_chunk_stops_later_chunks() {
        let target = RecordingTarget::failing_group_after(1);

        let err = deliver(
            &items(25),
            &request(),
            &Settings::default(),
            &target,
            &Texts::for_language_code(None),
        )
        .await
        .expect_err("second chunk fails");
        assert!(matches!(err, VidraError::Channel { .. }));

        let groups = target
            .calls()
            .iter()
            .filter(|c| matches!(c, TargetCall::SendGroup(_)))
            .count();
        assert_eq!(groups, 1);
    }
}
