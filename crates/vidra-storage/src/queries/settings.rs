// SPDX-FileCopyrightText: 2026 Vidra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-conversation settings persistence.

use rusqlite::params;

use vidra_core::{ChatScope, Settings, VidraError};

use crate::database::Database;

/// Get the stored settings for a conversation, `None` when never written.
pub async fn get_settings(
    db: &Database,
    scope: ChatScope,
) -> Result<Option<Settings>, VidraError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT language, preferred_output, preferred_attribution
                 FROM settings WHERE scope_id = ?1",
            )?;
            let result = stmt
                .query_row(params![scope.0], |row| {
                    Ok(Settings {
                        language: row.get(0)?,
                        preferred_output: row.get(1)?,
                        preferred_attribution: row.get::<_, i64>(2)? != 0,
                    })
                })
                .map(Some)
                .or_else(|e| match e {
                    rusqlite::Error::QueryReturnedNoRows => Ok(None),
                    other => Err(other),
                })?;
            Ok(result)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Upsert the full settings row for a conversation.
pub async fn put_settings(
    db: &Database,
    scope: ChatScope,
    settings: &Settings,
) -> Result<(), VidraError> {
    let settings = settings.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO settings (scope_id, language, preferred_output, preferred_attribution)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(scope_id) DO UPDATE SET
                     language = excluded.language,
                     preferred_output = excluded.preferred_output,
                     preferred_attribution = excluded.preferred_attribution",
                params![
                    scope.0,
                    settings.language,
                    settings.preferred_output,
                    settings.preferred_attribution as i64,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
