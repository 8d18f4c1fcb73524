// SPDX-FileCopyrightText: 2026 Cupflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All access is serialized through tokio-rusqlite's single background
//! thread: `Database` wraps one `tokio_rusqlite::Connection`, and every query
//! function goes through `db.connection().call(...)`. Do not create
//! additional connections for writes.

use std::path::Path;

use cupflow_core::CupflowError;
use tokio_rusqlite::Connection;
use tracing::debug;

use crate::migrations;

/// Handle to the application database.
///
/// Cheap to clone; clones share the same background connection thread.
#[derive(Clone)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at `path` with WAL mode enabled and run
    /// pending migrations.
    pub async fn open(path: &str) -> Result<Self, CupflowError> {
        Self::open_with_options(path, true).await
    }

    /// Open with explicit control over WAL mode.
    pub async fn open_with_options(path: &str, wal_mode: bool) -> Result<Self, CupflowError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| CupflowError::Storage {
                source: Box::new(e),
            })?;
        }

        let conn = Connection::open(path).await.map_err(map_rusqlite_err)?;

        conn.call(move |conn| {
            if wal_mode {
                conn.pragma_update(None, "journal_mode", "WAL")
                    .map_err(map_rusqlite_err)?;
            }
            conn.execute_batch(
                "PRAGMA synchronous = NORMAL;
                 PRAGMA foreign_keys = ON;
                 PRAGMA busy_timeout = 5000;",
            )
            .map_err(map_rusqlite_err)?;
            migrations::run_migrations(conn)?;
            Ok(())
        })
        .await
        .map_err(map_tr_cupflow_err)?;

        debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// The underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Checkpoint the WAL before shutdown.
    pub async fn close(&self) -> Result<(), CupflowError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

/// Convert a tokio-rusqlite error into the storage error variant.
pub fn map_tr_err(e: tokio_rusqlite::Error) -> CupflowError {
    CupflowError::Storage {
        source: Box::new(e),
    }
}

/// Convert a tokio-rusqlite error carrying a [`CupflowError`] payload (from a
/// closure that already produces `CupflowError`) into the storage variant.
pub fn map_tr_cupflow_err(e: tokio_rusqlite::Error<CupflowError>) -> CupflowError {
    CupflowError::Storage {
        source: Box::new(e),
    }
}

/// Convert a rusqlite error into the storage error variant.
pub fn map_rusqlite_err(e: rusqlite::Error) -> CupflowError {
    CupflowError::Storage {
        source: Box::new(e),
    }
}
