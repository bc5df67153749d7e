//! Inventory store (libSQL) configuration.

use serde::{Deserialize, Serialize};

/// Default local database file, relative to the project root.
pub const DEFAULT_DB_PATH: &str = ".avault/avault.db";

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

const fn default_read_your_writes() -> bool {
    true
}

/// Where the inventory lives.
///
/// With `url` and `auth_token` set, the store is an embedded replica of a
/// remote libSQL database kept at `local_replica_path`. Otherwise it is a
/// plain local file at `db_path`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Remote database URL (e.g., `libsql://avault-umc.turso.io`).
    #[serde(default)]
    pub url: String,

    /// Remote database auth token.
    #[serde(default)]
    pub auth_token: String,

    /// Embedded replica file used when syncing with a remote database.
    #[serde(default)]
    pub local_replica_path: String,

    /// Local database file used when no remote database is configured.
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// Whether reads observe the caller's own writes before the next sync.
    #[serde(default = "default_read_your_writes")]
    pub read_your_writes: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            auth_token: String::new(),
            local_replica_path: String::new(),
            db_path: default_db_path(),
            read_your_writes: default_read_your_writes(),
        }
    }
}

impl StoreConfig {
    /// Check if the remote database has the minimum required fields.
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty() && !self.auth_token.is_empty()
    }

    /// Replica path for synced mode; falls back to a file next to `db_path`.
    pub fn replica_path(&self) -> String {
        if self.local_replica_path.is_empty() {
            format!("{}.replica", self.db_path)
        } else {
            self.local_replica_path.clone()
        }
    }
}
