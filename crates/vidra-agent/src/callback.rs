// SPDX-FileCopyrightText: 2026 Vidra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Callback button payload grammar.
//!
//! Telegram callback data is limited to 64 bytes, so payloads are compact
//! colon-separated tokens. Every payload built by the menu module parses
//! back to the same variant; the round trip is load-bearing because the
//! request id and setting key travel through the remote keyboard unchanged.

use std::str::FromStr;

use vidra_core::{OutputFormat, RequestId, SettingKey};

/// Parsed form of one callback button payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackPayload {
    /// Picker button: resolve `request` with `format`.
    Output {
        request: RequestId,
        format: OutputFormat,
    },
    /// Settings root row: open the field menu for `key`.
    OpenSetting { key: SettingKey },
    /// Field menu: return to the settings root.
    Back,
    /// Field menu row: apply value `index` of `key`'s value list.
    SetValue { key: SettingKey, index: usize },
}

impl CallbackPayload {
    /// Serializes to the wire form embedded in `callback_data`.
    pub fn encode(&self) -> String {
        match self {
            Self::Output { request, format } => format!("dl:{request}:{format}"),
            Self::OpenSetting { key } => format!("set:{key}"),
            Self::Back => "set:back".to_string(),
            Self::SetValue { key, index } => format!("setv:{key}:{index}"),
        }
    }

    /// Parses a wire payload. `None` for anything this bot did not emit;
    /// foreign payloads are ignored by the callback handler.
    pub fn parse(data: &str) -> Option<Self> {
        let (prefix, rest) = data.split_once(':')?;
        match prefix {
            "dl" => {
                let (request, format) = rest.rsplit_once(':')?;
                if request.is_empty() {
                    return None;
                }
                Some(Self::Output {
                    request: RequestId(request.to_string()),
                    format: OutputFormat::from_str(format).ok()?,
                })
            }
            "set" => {
                if rest == "back" {
                    Some(Self::Back)
                } else {
                    Some(Self::OpenSetting {
                        key: SettingKey::from_str(rest).ok()?,
                    })
                }
            }
            "setv" => {
                let (key, index) = rest.rsplit_once(':')?;
                Some(Self::SetValue {
                    key: SettingKey::from_str(key).ok()?,
                    index: index.parse().ok()?,
                })
            }
            _ => None,
        }
    }
}
