// SPDX-FileCopyrightText: 2026 Vidra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`ResolveTarget`] implementations for the two kinds of status message.
//!
//! A resolution started from a chat message edits that message in place;
//! one started from an inline answer edits the inline message and sends
//! media groups to the author's private chat (inline messages cannot grow
//! into albums).

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{
    InputFile, InputMedia, InputMediaAudio, InputMediaDocument, InputMediaPhoto, InputMediaVideo,
    MessageId,
};

use vidra_agent::ResolveTarget;
use vidra_core::{MediaItem, MediaKind, MediaSource, VidraError};

/// Status message living in a regular chat.
pub struct MessageTarget {
    pub bot: Bot,
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

/// Status message created from an inline answer.
pub struct InlineTarget {
    pub bot: Bot,
    pub inline_message_id: String,
    /// Private chat of the request author, the only place groups can go.
    pub group_chat_id: ChatId,
}

/// Converts a backend media item into the Telegram input shape.
pub fn media_to_input(item: &MediaItem, caption: &str) -> InputMedia {
    let file = match &item.source {
        MediaSource::Url(url) => InputFile::url(url.clone()),
        MediaSource::Bytes(data) => {
            let file = InputFile::memory(data.clone());
            match &item.file_name {
                Some(name) => file.file_name(name.clone()),
                None => file,
            }
        }
    };

    // Telegram drops empty captions, so unconditional set is safe.
    match item.kind {
        MediaKind::Photo => {
            InputMedia::Photo(InputMediaPhoto::new(file).caption(caption.to_string()))
        }
        MediaKind::Video => {
            InputMedia::Video(InputMediaVideo::new(file).caption(caption.to_string()))
        }
        MediaKind::Audio => {
            InputMedia::Audio(InputMediaAudio::new(file).caption(caption.to_string()))
        }
        MediaKind::Document => {
            InputMedia::Document(InputMediaDocument::new(file).caption(caption.to_string()))
        }
    }
}

fn channel_err(context: &str, e: teloxide::RequestError) -> VidraError {
    VidraError::Channel {
        message: format!("{context}: {e}"),
        source: Some(Box::new(e)),
    }
}

/// Whether an edit failure is the harmless "message is not modified" case.
fn is_not_modified(e: &teloxide::RequestError) -> bool {
    e.to_string().contains("message is not modified")
}

#[async_trait]
impl ResolveTarget for MessageTarget {
    async fn edit_text(&self, text: &str) -> Result<(), VidraError> {
        match self
            .bot
            .edit_message_text(self.chat_id, self.message_id, text)
            .await
        {
            Ok(_) => Ok(()),
            Err(e) if is_not_modified(&e) => Ok(()),
            Err(e) => Err(channel_err("failed to edit status text", e)),
        }
    }

    async fn edit_media(&self, item: &MediaItem, caption: &str) -> Result<(), VidraError> {
        self.bot
            .edit_message_media(self.chat_id, self.message_id, media_to_input(item, caption))
            .await
            .map_err(|e| channel_err("failed to edit status media", e))?;
        Ok(())
    }

    async fn send_group(&self, items: &[MediaItem]) -> Result<(), VidraError> {
        let medias: Vec<InputMedia> = items.iter().map(|i| media_to_input(i, "")).collect();
        self.bot
            .send_media_group(self.chat_id, medias)
            .await
            .map_err(|e| channel_err("failed to send media group", e))?;
        Ok(())
    }
}

#[async_trait]
impl ResolveTarget for InlineTarget {
    async fn edit_text(&self, text: &str) -> Result<(), VidraError> {
        match self
            .bot
            .edit_message_text_inline(&self.inline_message_id, text)
            .await
        {
            Ok(_) => Ok(()),
            Err(e) if is_not_modified(&e) => Ok(()),
            Err(e) => Err(channel_err("failed to edit inline status text", e)),
        }
    }

    async fn edit_media(&self, item: &MediaItem, caption: &str) -> Result<(), VidraError> {
        self.bot
            .edit_message_media_inline(&self.inline_message_id, media_to_input(item, caption))
            .await
            .map_err(|e| channel_err("failed to edit inline status media", e))?;
        Ok(())
    }

    async fn send_group(&self, items: &[MediaItem]) -> Result<(), VidraError> {
        let medias: Vec<InputMedia> = items.iter().map(|i| media_to_input(i, "")).collect();
        self.bot
            .send_media_group(self.group_chat_id, medias)
            .await
            .map_err(|e| channel_err("failed to send media group", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_item_maps_to_url_input_with_caption() {
        let item = MediaItem::from_url(
            MediaKind::Video,
            "https://example.com/v.mp4".parse().expect("url"),
        );
        match media_to_input(&item, "src") {
            InputMedia::Video(video) => assert_eq!(video.caption.as_deref(), Some("src")),
            other => panic!("unexpected input media {other:?}"),
        }
    }

    #[test]
    fn bytes_item_keeps_its_file_name() {
        let item = MediaItem {
            kind: MediaKind::Document,
            source: MediaSource::Bytes(vec![1, 2, 3]),
            file_name: Some("report.pdf".into()),
        };
        match media_to_input(&item, "") {
            InputMedia::Document(_) => {}
            other => panic!("unexpected input media {other:?}"),
        }
    }
}
