//! Service layer hosting every repository method.
//!
//! `AvService` wraps `AvDb`. Repo modules add methods through
//! `impl AvService` blocks, one module per table plus the cross-table
//! workflows (session completion, legacy migration, import).

use av_config::StoreConfig;

use crate::AvDb;
use crate::error::DatabaseError;

pub struct AvService {
    db: AvDb,
}

impl AvService {
    /// Create a service over a local database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        Ok(Self {
            db: AvDb::open_local(db_path).await?,
        })
    }

    /// Create a service backed by a synced embedded replica.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the replica cannot be opened.
    pub async fn new_synced(
        local_replica_path: &str,
        remote_url: &str,
        auth_token: &str,
        read_your_writes: bool,
    ) -> Result<Self, DatabaseError> {
        Ok(Self {
            db: AvDb::open_synced(local_replica_path, remote_url, auth_token, read_your_writes)
                .await?,
        })
    }

    /// Open whichever store the configuration describes: an embedded replica
    /// when the remote database is configured, otherwise the local file.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the chosen store cannot be opened.
    pub async fn from_config(store: &StoreConfig) -> Result<Self, DatabaseError> {
        if store.is_configured() {
            Self::new_synced(
                &store.replica_path(),
                &store.url,
                &store.auth_token,
                store.read_your_writes,
            )
            .await
        } else {
            Self::new_local(&store.db_path).await
        }
    }

    /// Create from an existing `AvDb` (for testing).
    #[must_use]
    pub const fn from_db(db: AvDb) -> Self {
        Self { db }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &AvDb {
        &self.db
    }

    /// Sync the underlying database with the remote primary.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the sync fails.
    pub async fn sync(&self) -> Result<(), DatabaseError> {
        self.db.sync().await
    }

    /// Returns whether this service is backed by a synced replica.
    #[must_use]
    pub const fn is_synced_replica(&self) -> bool {
        self.db.is_synced_replica()
    }
}
