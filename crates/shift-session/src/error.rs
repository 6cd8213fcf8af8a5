//! Error types for session-core operations.

use std::io;
use thiserror::Error;

/// Result type for session-core operations.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors that can occur while persisting or restoring a session.
///
/// Expected outcomes (bad credentials, duplicate email) are not errors;
/// they are carried by [`crate::auth::LoginOutcome`] and
/// [`crate::auth::RegisterOutcome`].
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SessionError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),
}
