// SPDX-FileCopyrightText: 2026 Vidra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across collaborator traits and the Vidra workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Unique identifier for a media request.
///
/// Stable once assigned. The same token is used as the SQLite primary key,
/// the inline result id, and the callback-payload token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub String);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of a user, channel-agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

/// Identity of the conversation a request or settings record belongs to.
///
/// For private chats this equals the user's id; for groups it is the
/// (negative) group chat id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatScope(pub i64);

/// One user-submitted reference awaiting or having completed format
/// resolution. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRequest {
    pub id: RequestId,
    /// The original reference string as submitted.
    pub url: String,
    /// Identity of the submitter, checked on every later button press.
    pub author_id: UserId,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

/// A selectable delivery format offered to the user.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    /// Keep whatever the backend classifies the reference as.
    Auto,
    Audio,
    Video,
}

/// Per-conversation configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// BCP 47 language tag override. `None` falls back to the sender's
    /// client language.
    pub language: Option<String>,

    /// When set, selection is auto-resolved with this format instead of
    /// presenting a picker (always, in non-private surfaces).
    pub preferred_output: Option<String>,

    /// When true, single-media deliveries are captioned with the original
    /// reference URL.
    pub preferred_attribution: bool,
}

/// Wire value that clears an optional setting back to its default.
pub const VALUE_UNSET: &str = "unset";

impl Settings {
    /// Returns a copy with one field replaced by a raw wire value.
    ///
    /// `None` means the value was not applicable to the key and no change
    /// should be recorded; callers keep displaying the previous settings.
    pub fn with_value(&self, key: SettingKey, raw: &str) -> Option<Settings> {
        let raw = raw.trim();
        let mut next = self.clone();
        match key {
            SettingKey::Language => {
                if raw == VALUE_UNSET {
                    next.language = None;
                } else {
                    raw.parse::<unic_langid::LanguageIdentifier>().ok()?;
                    next.language = Some(raw.to_string());
                }
            }
            SettingKey::PreferredOutput => {
                if raw == VALUE_UNSET {
                    next.preferred_output = None;
                } else if raw.is_empty() {
                    return None;
                } else {
                    next.preferred_output = Some(raw.to_string());
                }
            }
            SettingKey::PreferredAttribution => {
                next.preferred_attribution = match raw {
                    "on" => true,
                    "off" => false,
                    _ => return None,
                };
            }
        }
        Some(next)
    }
}

/// Key of one mutable field in [`Settings`].
///
/// The wire form (snake_case) is embedded in settings-menu button payloads
/// and must round-trip unchanged.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
pub enum SettingKey {
    Language,
    PreferredOutput,
    PreferredAttribution,
}

/// Classification of a deliverable media unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum MediaKind {
    Photo,
    Video,
    Audio,
    Document,
}

/// Where the bytes of a media item come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    /// A remote URL the chat platform fetches itself.
    Url(url::Url),
    /// In-memory bytes uploaded with the message.
    Bytes(Vec<u8>),
}

/// One deliverable unit returned by the download backend.
///
/// Opaque to the orchestration core beyond being deliverable singly or in
/// a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    pub kind: MediaKind,
    pub source: MediaSource,
    pub file_name: Option<String>,
}

impl MediaItem {
    /// Convenience constructor for a URL-sourced item.
    pub fn from_url(kind: MediaKind, url: url::Url) -> Self {
        Self {
            kind,
            source: MediaSource::Url(url),
            file_name: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_value_sets_and_clears_language() {
        let settings = Settings::default();
        let updated = settings
            .with_value(SettingKey::Language, "ru")
            .expect("valid tag");
        assert_eq!(updated.language.as_deref(), Some("ru"));

        let cleared = updated
            .with_value(SettingKey::Language, VALUE_UNSET)
            .expect("unset applies");
        assert!(cleared.language.is_none());
    }

    #[test]
    fn with_value_rejects_invalid_language_tag() {
        let settings = Settings::default();
        assert!(settings.with_value(SettingKey::Language, "!!").is_none());
    }

    #[test]
    fn with_value_attribution_accepts_only_on_off() {
        let settings = Settings::default();
        assert!(
            settings
                .with_value(SettingKey::PreferredAttribution, "on")
                .expect("on applies")
                .preferred_attribution
        );
        assert!(
            settings
                .with_value(SettingKey::PreferredAttribution, "maybe")
                .is_none()
        );
    }

    #[test]
    fn with_value_preferred_output_keeps_raw_text() {
        let settings = Settings::default();
        let updated = settings
            .with_value(SettingKey::PreferredOutput, "audio")
            .expect("applies");
        assert_eq!(updated.preferred_output.as_deref(), Some("audio"));

        // Free-text custom values are stored verbatim.
        let custom = settings
            .with_value(SettingKey::PreferredOutput, "mp3-320k")
            .expect("applies");
        assert_eq!(custom.preferred_output.as_deref(), Some("mp3-320k"));

        assert!(
            settings
                .with_value(SettingKey::PreferredOutput, "  ")
                .is_none()
        );
    }

    #[test]
    fn with_value_never_mutates_the_original() {
        let settings = Settings::default();
        let _ = settings.with_value(SettingKey::PreferredAttribution, "on");
        assert!(!settings.preferred_attribution);
    }
}
