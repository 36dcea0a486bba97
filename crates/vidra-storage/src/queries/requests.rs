// SPDX-FileCopyrightText: 2026 Vidra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Media request CRUD operations.

use rusqlite::params;

use vidra_core::{MediaRequest, RequestId, UserId, VidraError};

use crate::database::Database;

/// Insert a new request. Requests are immutable afterwards.
pub async fn insert_request(db: &Database, request: &MediaRequest) -> Result<(), VidraError> {
    let request = request.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO requests (id, url, author_id, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    request.id.0,
                    request.url,
                    request.author_id.0,
                    request.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a request by id. Absent rows are a normal outcome.
pub async fn get_request(
    db: &Database,
    id: &RequestId,
) -> Result<Option<MediaRequest>, VidraError> {
    let id = id.0.clone();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, url, author_id, created_at FROM requests WHERE id = ?1",
            )?;
            let result = stmt
                .query_row(params![id], |row| {
                    Ok(MediaRequest {
                        id: RequestId(row.get(0)?),
                        url: row.get(1)?,
                        author_id: UserId(row.get(2)?),
                        created_at: row.get(3)?,
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
