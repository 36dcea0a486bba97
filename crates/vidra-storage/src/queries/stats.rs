// SPDX-FileCopyrightText: 2026 Vidra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Best-effort download counters.

use rusqlite::params;

use vidra_core::{UserId, VidraError};

use crate::database::Database;

/// Increment the download counter for a user, creating the row on first use.
pub async fn increment_downloads(db: &Database, user: UserId) -> Result<(), VidraError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO download_stats (user_id, downloads) VALUES (?1, 1)
                 ON CONFLICT(user_id) DO UPDATE SET downloads = downloads + 1",
                params![user.0],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Read a user's download counter. Used by tests and future stats surfaces.
pub async fn get_downloads(db: &Database, user: UserId) -> Result<i64, VidraError> {
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare("SELECT downloads FROM download_stats WHERE user_id = ?1")?;
            let count = stmt
                .query_row(params![user.0], |row| row.get::<_, i64>(0))
                .or_else(|e| match e {
                    rusqlite::Error::QueryReturnedNoRows => Ok(0),
                    other => Err(other),
                })?;
            Ok(count)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
