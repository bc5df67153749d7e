//! Database error types for av-db.

use thiserror::Error;

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed or returned unparseable data.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Input rejected before touching the database.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The category still has items assigned to it.
    #[error("Cannot delete category: {count} item(s) still use it. Reassign them first.")]
    CategoryInUse { count: u32 },

    /// Invalid state encountered (e.g., operation not allowed in this mode).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DatabaseError {
    pub(crate) fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }
}

impl From<av_core::errors::CoreError> for DatabaseError {
    fn from(err: av_core::errors::CoreError) -> Self {
        match err {
            av_core::errors::CoreError::Validation(msg) => Self::Validation(msg),
            other => Self::Other(other.into()),
        }
    }
}
