// SPDX-FileCopyrightText: 2026 Vidra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Localized message tables and evaluators.
//!
//! Every user-visible string goes through [`Texts`], resolved from the
//! conversation's settings (explicit `language` override) or the sender's
//! client language code. Russian falls back to English for untranslated
//! keys; unknown keys render as the key itself so a missing entry is
//! visible instead of a crash.

use unic_langid::LanguageIdentifier;

use crate::error::VidraError;
use crate::types::Settings;

/// Locale-bound text and error evaluators for one conversation.
#[derive(Debug, Clone)]
pub struct Texts {
    lang: LanguageIdentifier,
}

impl Texts {
    /// Resolves from a raw client language code (`msg.from.language_code`).
    ///
    /// Unparseable or missing codes land on the undetermined locale, which
    /// the tables treat as English.
    pub fn for_language_code(code: Option<&str>) -> Self {
        let lang = code
            .and_then(|c| c.parse::<LanguageIdentifier>().ok())
            .unwrap_or_default();
        Self { lang }
    }

    /// Resolves from settings, preferring the explicit `language` override.
    ///
    /// Must be re-derived after any settings update that can change the
    /// locale; a pre-update evaluator renders stale-locale text.
    pub fn for_settings(settings: &Settings, client_code: Option<&str>) -> Self {
        Self::for_language_code(settings.language.as_deref().or(client_code))
    }

    pub fn lang(&self) -> &LanguageIdentifier {
        &self.lang
    }

    /// Looks up a message by key.
    pub fn text(&self, key: &str) -> String {
        t(&self.lang, key).to_string()
    }

    /// Looks up a message and substitutes `{name}` placeholders.
    pub fn text_with(&self, key: &str, args: &[(&str, &str)]) -> String {
        let mut out = self.text(key);
        for (name, value) in args {
            out = out.replace(&format!("{{{name}}}"), value);
        }
        out
    }

    /// Renders an error in the user's locale.
    pub fn error(&self, err: &VidraError) -> String {
        match err {
            VidraError::UnsupportedReference(reference) => {
                self.text_with("error.unsupported-reference", &[("reference", reference)])
            }
            VidraError::RequestNotFound { .. } => self.text("error.request-not-found"),
            VidraError::Download { message, .. } => {
                self.text_with("error.download-failed", &[("detail", message)])
            }
            VidraError::Storage { .. } => self.text("error.storage"),
            _ => self.text("error.internal"),
        }
    }
}

/// Raw table lookup. Unknown keys echo back so they stand out in chat
/// during development instead of panicking.
pub fn t<'a>(lang: &LanguageIdentifier, key: &'a str) -> &'a str {
    let localized = match lang.language.as_str() {
        "ru" => ru(key),
        _ => None,
    };
    localized.or_else(|| en(key)).unwrap_or(key)
}

fn en(key: &str) -> Option<&'static str> {
    Some(match key {
        "start.greeting" => {
            "Send me a link and I will fetch the media for you. \
             Use /settings to change how I deliver it."
        }
        "easteregg.meow" => "meow :з",

        "download.select-output" => "Choose an output format",
        "download.downloading" => "Downloading…",
        "download.uploading" => "Uploading…",
        "download.note-many" => "This link has several items, sending them as albums",
        "download.error" => "Something went wrong: {message}",
        "download.error-title" => "Could not process this link",
        "download.not-button-owner" => "This button belongs to someone else's request",

        "output.auto" => "Auto",
        "output.audio" => "Audio",
        "output.video" => "Video",

        "settings.title" => "Settings",
        "settings.open" => "Open settings",
        "settings.admin-only" => "Only group administrators can change settings",
        "settings.custom-prompt" => "Send the value you want as a plain message",
        "settings.saved" => "Saved",
        "settings.back" => "« Back",

        "setting.language" => "Language",
        "setting.preferred_output" => "Preferred output",
        "setting.preferred_attribution" => "Source link on media",

        "value.unset" => "not set",
        "value.on" => "on",
        "value.off" => "off",
        "value.custom" => "Custom…",

        "error.unsupported-reference" => "I don't understand this reference: {reference}",
        "error.request-not-found" => "This request has expired, send the link again",
        "error.download-failed" => "The download failed ({detail})",
        "error.storage" => "Temporary storage trouble, try again in a moment",
        "error.internal" => "Internal error, try again later",

        _ => return None,
    })
}

fn ru(key: &str) -> Option<&'static str> {
    Some(match key {
        "start.greeting" => {
            "Пришли мне ссылку, и я скачаю медиа. \
             Команда /settings меняет способ доставки."
        }

        "download.select-output" => "Выбери формат",
        "download.downloading" => "Скачиваю…",
        "download.uploading" => "Загружаю…",
        "download.note-many" => "По ссылке несколько файлов, отправлю альбомами",
        "download.error" => "Что-то пошло не так: {message}",
        "download.error-title" => "Не получилось обработать ссылку",
        "download.not-button-owner" => "Эта кнопка относится к чужому запросу",

        "output.auto" => "Авто",
        "output.audio" => "Аудио",
        "output.video" => "Видео",

        "settings.title" => "Настройки",
        "settings.open" => "Открыть настройки",
        "settings.admin-only" => "Менять настройки могут только администраторы группы",
        "settings.custom-prompt" => "Отправь нужное значение обычным сообщением",
        "settings.saved" => "Сохранено",
        "settings.back" => "« Назад",

        "setting.language" => "Язык",
        "setting.preferred_output" => "Формат по умолчанию",
        "setting.preferred_attribution" => "Ссылка на источник",

        "value.unset" => "не задано",
        "value.on" => "вкл",
        "value.off" => "выкл",
        "value.custom" => "Свой вариант…",

        "error.unsupported-reference" => "Не понимаю эту ссылку: {reference}",
        "error.request-not-found" => "Запрос устарел, отправь ссылку ещё раз",
        "error.download-failed" => "Скачивание не удалось ({detail})",
        "error.storage" => "Временные неполадки с хранилищем, попробуй чуть позже",
        "error.internal" => "Внутренняя ошибка, попробуй позже",

        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RequestId;

    #[test]
    fn unknown_language_falls_back_to_english() {
        let texts = Texts::for_language_code(Some("sw"));
        assert_eq!(texts.text("settings.saved"), "Saved");
    }

    #[test]
    fn invalid_language_code_falls_back_to_english() {
        let texts = Texts::for_language_code(Some("not a tag!"));
        assert_eq!(texts.text("value.on"), "on");
    }

    #[test]
    fn russian_lookup() {
        let texts = Texts::for_language_code(Some("ru"));
        assert_eq!(texts.text("settings.saved"), "Сохранено");
    }

    #[test]
    fn russian_falls_back_to_english_for_untranslated_key() {
        let texts = Texts::for_language_code(Some("ru"));
        assert_eq!(texts.text("easteregg.meow"), "meow :з");
    }

    #[test]
    fn settings_language_overrides_client_code() {
        let settings = Settings {
            language: Some("ru".into()),
            ..Settings::default()
        };
        let texts = Texts::for_settings(&settings, Some("en"));
        assert_eq!(texts.text("settings.title"), "Настройки");
    }

    #[test]
    fn unknown_key_echoes_back() {
        let texts = Texts::for_language_code(None);
        assert_eq!(texts.text("no.such.key"), "no.such.key");
    }

    #[test]
    fn placeholder_interpolation() {
        let texts = Texts::for_language_code(None);
        let out = texts.text_with("download.error", &[("message", "boom")]);
        assert_eq!(out, "Something went wrong: boom");
    }

    #[test]
    fn error_rendering_localizes_variants() {
        let texts = Texts::for_language_code(Some("ru"));
        let err = VidraError::RequestNotFound {
            id: RequestId("r1".into()),
        };
        assert_eq!(texts.error(&err), "Запрос устарел, отправь ссылку ещё раз");

        let err = VidraError::UnsupportedReference("ftp://x".into());
        assert!(texts.error(&err).contains("ftp://x"));
    }
}
