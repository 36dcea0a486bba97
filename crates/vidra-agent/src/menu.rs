// SPDX-FileCopyrightText: 2026 Vidra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure builders for the format picker and the settings menus.
//!
//! Menus are plain data (label + payload per button); the Telegram adapter
//! converts them into inline keyboards. Building here keeps the button
//! grammar and the menu shape testable without a network.

use strum::IntoEnumIterator;

use vidra_core::i18n::Texts;
use vidra_core::types::VALUE_UNSET;
use vidra_core::{OutputFormat, RequestId, SettingKey, Settings};

use crate::callback::CallbackPayload;

/// A rendered menu: localized title plus button rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub title: String,
    pub rows: Vec<Vec<MenuButton>>,
}

/// One inline button: localized label and encoded callback payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuButton {
    pub label: String,
    pub payload: String,
}

impl MenuButton {
    fn new(label: String, payload: CallbackPayload) -> Self {
        Self {
            label,
            payload: payload.encode(),
        }
    }
}

/// One selectable value in a setting's field menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingValue {
    /// A literal wire value applied directly on tap.
    Literal(&'static str),
    /// The sentinel that switches the caller into free-text entry.
    Custom,
}

/// The output formats offered for a request.
///
/// Uniform for URL references today; derived per request so content-aware
/// option sets slot in without touching the picker protocol.
pub fn output_options(_request: &RequestId) -> Vec<OutputFormat> {
    OutputFormat::iter().collect()
}

/// Builds the format picker shown right after a request is created.
///
/// All options sit in a single row, each button payload carrying
/// `{request, format}` so any copy of the keyboard resolves the same
/// request.
pub fn selection_menu(texts: &Texts, request: &RequestId) -> Menu {
    let row = output_options(request)
        .into_iter()
        .map(|format| {
            MenuButton::new(
                texts.text(&format!("output.{format}")),
                CallbackPayload::Output {
                    request: request.clone(),
                    format,
                },
            )
        })
        .collect();

    Menu {
        title: texts.text("download.select-output"),
        rows: vec![row],
    }
}

/// Builds the settings root menu: one row per setting, labelled
/// `title: current value`.
pub fn settings_menu(texts: &Texts, settings: &Settings) -> Menu {
    let rows = SettingKey::iter()
        .map(|key| {
            let label = format!(
                "{}: {}",
                texts.text(&format!("setting.{key}")),
                current_value_label(texts, settings, key)
            );
            vec![MenuButton::new(label, CallbackPayload::OpenSetting { key })]
        })
        .collect();

    Menu {
        title: texts.text("settings.title"),
        rows,
    }
}

/// Builds the field menu for one setting: one row per value, plus back.
pub fn setting_menu(texts: &Texts, settings: &Settings, key: SettingKey) -> Menu {
    let mut rows: Vec<Vec<MenuButton>> = setting_values(key)
        .iter()
        .enumerate()
        .map(|(index, value)| {
            vec![MenuButton::new(
                value_label(texts, key, *value),
                CallbackPayload::SetValue { key, index },
            )]
        })
        .collect();
    rows.push(vec![MenuButton::new(
        texts.text("settings.back"),
        CallbackPayload::Back,
    )]);

    Menu {
        title: format!(
            "{}: {}",
            texts.text(&format!("setting.{key}")),
            current_value_label(texts, settings, key)
        ),
        rows,
    }
}

/// The selectable values for a setting. The final entry is always the
/// free-text sentinel for keys that accept arbitrary input.
pub fn setting_values(key: SettingKey) -> &'static [SettingValue] {
    use SettingValue::{Custom, Literal};
    match key {
        SettingKey::Language => &[Literal(VALUE_UNSET), Literal("en"), Literal("ru"), Custom],
        SettingKey::PreferredOutput => &[
            Literal(VALUE_UNSET),
            Literal("auto"),
            Literal("audio"),
            Literal("video"),
            Custom,
        ],
        SettingKey::PreferredAttribution => &[Literal("on"), Literal("off")],
    }
}

fn current_value_label(texts: &Texts, settings: &Settings, key: SettingKey) -> String {
    match key {
        SettingKey::Language => settings
            .language
            .clone()
            .unwrap_or_else(|| texts.text("value.unset")),
        SettingKey::PreferredOutput => settings
            .preferred_output
            .clone()
            .unwrap_or_else(|| texts.text("value.unset")),
        SettingKey::PreferredAttribution => {
            if settings.preferred_attribution {
                texts.text("value.on")
            } else {
                texts.text("value.off")
            }
        }
    }
}

fn value_label(texts: &Texts, key: SettingKey, value: SettingValue) -> String {
    match value {
        SettingValue::Custom => texts.text("value.custom"),
        SettingValue::Literal(VALUE_UNSET) => texts.text("value.unset"),
        SettingValue::Literal(raw) => match key {
            SettingKey::PreferredOutput => texts.text(&format!("output.{raw}")),
            SettingKey::PreferredAttribution => texts.text(&format!("value.{raw}")),
            SettingKey::Language => raw.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callback::CallbackPayload;

    fn texts() -> Texts {
        Texts::for_language_code(Some("en"))
    }

    #[test]
    fn selection_menu_has_one_button_per_format_in_one_row() {
        let request = RequestId("r1".into());
        let menu = selection_menu(&texts(), &request);

        assert_eq!(menu.rows.len(), 1);
        assert_eq!(menu.rows[0].len(), output_options(&request).len());

        for button in &menu.rows[0] {
            match CallbackPayload::parse(&button.payload) {
                Some(CallbackPayload::Output { request: r, .. }) => assert_eq!(r, request),
                other => panic!("unexpected payload {other:?}"),
            }
        }
    }

    #[test]
    fn selection_menu_payloads_are_unique() {
        let menu = selection_menu(&texts(), &RequestId("r1".into()));
        let mut payloads: Vec<_> = menu.rows[0].iter().map(|b| b.payload.clone()).collect();
        payloads.sort();
        payloads.dedup();
        assert_eq!(payloads.len(), menu.rows[0].len());
    }

    #[test]
    fn settings_menu_shows_current_values() {
        let settings = Settings {
            language: Some("ru".into()),
            preferred_output: Some("audio".into()),
            preferred_attribution: true,
        };
        let menu = settings_menu(&texts(), &settings);

        assert_eq!(menu.rows.len(), 3);
        let labels: Vec<_> = menu.rows.iter().map(|r| r[0].label.clone()).collect();
        assert!(labels.iter().any(|l| l.contains("ru")));
        assert!(labels.iter().any(|l| l.contains("audio")));
        assert!(labels.iter().any(|l| l.contains("on")));
    }

    #[test]
    fn field_menu_rerender_after_update_keeps_payloads_and_shows_new_value() {
        let before = Settings::default();
        let after = before
            .with_value(SettingKey::PreferredOutput, "video")
            .expect("applies");

        let menu_before = setting_menu(&texts(), &before, SettingKey::PreferredOutput);
        let menu_after = setting_menu(&texts(), &after, SettingKey::PreferredOutput);

        let payloads = |menu: &Menu| -> Vec<String> {
            menu.rows
                .iter()
                .flat_map(|r| r.iter().map(|b| b.payload.clone()))
                .collect()
        };
        // Same button key set, only the displayed value changed.
        assert_eq!(payloads(&menu_before), payloads(&menu_after));
        assert!(menu_after.title.contains("video"));
        assert!(!menu_before.title.contains("video"));
    }

    #[test]
    fn custom_sentinel_is_last_where_offered() {
        assert_eq!(
            setting_values(SettingKey::Language).last(),
            Some(&SettingValue::Custom)
        );
        assert_eq!(
            setting_values(SettingKey::PreferredOutput).last(),
            Some(&SettingValue::Custom)
        );
        // A boolean has nothing custom about it.
        assert!(
            !setting_values(SettingKey::PreferredAttribution)
                .contains(&SettingValue::Custom)
        );
    }

    #[test]
    fn field_menu_ends_with_back_row() {
        let menu = setting_menu(&texts(), &Settings::default(), SettingKey::Language);
        let back = menu.rows.last().expect("rows");
        assert_eq!(
            CallbackPayload::parse(&back[0].payload),
            Some(CallbackPayload::Back)
        );
    }
}
