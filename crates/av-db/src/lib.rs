//! # av-db
//!
//! libSQL store for AVault inventory state.
//!
//! Holds categories, items, academic terms, count sessions, live and
//! historical counts, and users. The database is either a local file or a
//! Turso embedded replica that syncs with a remote primary.
//!
//! Uses the `libsql` crate (C `SQLite` fork, v0.9.29).

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;
pub mod updates;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;

/// Central database handle.
///
/// Wraps a libSQL database and its single connection, and generates IDs.
pub struct AvDb {
    db: libsql::Database,
    conn: libsql::Connection,
    synced: bool,
}

impl AvDb {
    /// Open a local-only database at the given path (no cloud sync).
    ///
    /// Runs migrations automatically on open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        if path != ":memory:"
            && let Some(parent) = std::path::Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::Migration(format!("create {}: {e}", parent.display()))
            })?;
        }

        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        let av_db = Self {
            db,
            conn,
            synced: false,
        };
        av_db.run_migrations().await?;
        tracing::debug!(path, "opened local database");
        Ok(av_db)
    }

    /// Open an embedded replica of a remote libSQL database.
    ///
    /// Pulls remote state once before running migrations, so the schema is
    /// created on the primary only when it does not exist there yet.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the replica cannot be built, the initial sync
    /// fails, or migrations fail.
    pub async fn open_synced(
        local_replica_path: &str,
        remote_url: &str,
        auth_token: &str,
        read_your_writes: bool,
    ) -> Result<Self, DatabaseError> {
        let db = Builder::new_remote_replica(
            local_replica_path,
            remote_url.to_string(),
            auth_token.to_string(),
        )
        .read_your_writes(read_your_writes)
        .build()
        .await?;
        db.sync().await?;
        let conn = db.connect()?;

        let av_db = Self {
            db,
            conn,
            synced: true,
        };
        av_db.run_migrations().await?;
        tracing::debug!(remote_url, local_replica_path, "opened embedded replica");
        Ok(av_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Whether this handle is an embedded replica of a remote database.
    #[must_use]
    pub const fn is_synced_replica(&self) -> bool {
        self.synced
    }

    /// Pull remote changes into the replica. No-op for local databases.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::LibSql` if the sync fails.
    pub async fn sync(&self) -> Result<(), DatabaseError> {
        if self.synced {
            self.db.sync().await?;
            tracing::debug!("replica synced");
        }
        Ok(())
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"itm-a3f8b2c1"`.
    ///
    /// Uses `randomblob(4)` in SQL to produce 8-char hex, then prepends the prefix.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}
