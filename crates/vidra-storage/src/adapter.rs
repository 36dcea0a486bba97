// SPDX-FileCopyrightText: 2026 Vidra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the core collaborator traits.

use async_trait::async_trait;

use vidra_config::model::StorageConfig;
use vidra_core::{
    ChatScope, MediaRequest, RequestId, RequestStore, SettingKey, Settings, SettingsStore,
    StatsStore, UserId, VidraError,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed storage implementing [`RequestStore`], [`SettingsStore`],
/// and [`StatsStore`].
///
/// All query operations are delegated to the typed query modules over the
/// single-writer [`Database`] connection.
pub struct SqliteStorage {
    db: Database,
}

impl SqliteStorage {
    /// Opens the database and applies migrations.
    pub async fn open(config: &StorageConfig) -> Result<Self, VidraError> {
        let db = Database::open(config).await?;
        Ok(Self { db })
    }

    /// Returns a reference to the underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }
}

/// Validates a submitted reference before it becomes a request.
///
/// Only absolute http(s) URLs are accepted; inline queries submit raw free
/// text which lands here unchanged.
fn validate_reference(reference: &str) -> Result<url::Url, VidraError> {
    let parsed = url::Url::parse(reference.trim())
        .map_err(|_| VidraError::UnsupportedReference(reference.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        _ => Err(VidraError::UnsupportedReference(reference.to_string())),
    }
}

#[async_trait]
impl RequestStore for SqliteStorage {
    async fn create(&self, url: &str, author: UserId) -> Result<MediaRequest, VidraError> {
        let parsed = validate_reference(url)?;
        let request = MediaRequest {
            id: RequestId(uuid::Uuid::new_v4().simple().to_string()),
            url: parsed.to_string(),
            author_id: author,
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        queries::requests::insert_request(&self.db, &request).await?;
        Ok(request)
    }

    async fn get(&self, id: &RequestId) -> Result<Option<MediaRequest>, VidraError> {
        queries::requests::get_request(&self.db, id).await
    }
}

#[async_trait]
impl SettingsStore for SqliteStorage {
    async fn get(&self, scope: ChatScope) -> Result<Settings, VidraError> {
        Ok(queries::settings::get_settings(&self.db, scope)
            .await?
            .unwrap_or_default())
    }

    async fn update(
        &self,
        scope: ChatScope,
        key: SettingKey,
        value: &str,
    ) -> Result<Option<Settings>, VidraError> {
        let current = SettingsStore::get(self, scope).await?;
        let Some(next) = current.with_value(key, value) else {
            return Ok(None);
        };
        queries::settings::put_settings(&self.db, scope, &next).await?;
        Ok(Some(next))
    }
}

#[async_trait]
impl StatsStore for SqliteStorage {
    async fn record_download(&self, user: UserId) -> Result<(), VidraError> {
        queries::stats::increment_downloads(&self.db, user).await
    }
}
