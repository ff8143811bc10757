//! Error types for session storage.

use thiserror::Error;

/// Session storage error type.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No live session has this identifier.
    #[error("Session not found")]
    NotFound,
}

/// Convenience result alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
