// SPDX-FileCopyrightText: 2026 Vidra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and
//! embedded migrations.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional Connection instances for writes.

use std::path::Path;

use tracing::debug;

use vidra_config::model::StorageConfig;
use vidra_core::VidraError;

mod embedded {
    refinery::embed_migrations!("migrations");
}

/// Handle over the single tokio-rusqlite connection.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Opens (creating if needed) the database at the configured path,
    /// applies PRAGMAs, and runs pending migrations.
    pub async fn open(config: &StorageConfig) -> Result<Self, VidraError> {
        if let Some(parent) = Path::new(&config.database_path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| VidraError::Storage {
                source: Box::new(e),
            })?;
        }

        let conn = tokio_rusqlite::Connection::open(&config.database_path)
            .await
            .map_err(map_tr_err)?;

        let wal_mode = config.wal_mode;
        conn.call(move |conn| {
            if wal_mode {
                conn.pragma_update(None, "journal_mode", "WAL")?;
            }
            conn.pragma_update(None, "busy_timeout", 5000)?;
            conn.pragma_update(None, "foreign_keys", "ON")?;
            embedded::migrations::runner()
                .run(conn)
                .map_err(|e| tokio_rusqlite::Error::Other(Box::new(e)))?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path = config.database_path.as_str(), "database opened");
        Ok(Self { conn })
    }

    /// Returns the underlying tokio-rusqlite connection for query modules.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }
}

/// Maps tokio-rusqlite errors into the workspace error type.
pub fn map_tr_err(e: tokio_rusqlite::Error) -> VidraError {
    VidraError::Storage {
        source: Box::new(e),
    }
}
