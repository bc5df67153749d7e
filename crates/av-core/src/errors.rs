//! Cross-cutting error types for AVault.
//!
//! Store errors (`DatabaseError`) live in `av-db`; the binary converges all of
//! them into `anyhow::Error` and prints the message verbatim.

use thiserror::Error;

/// Errors that can be raised by any AVault crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
