use kidscreen_core::error::CoreError;

/// Failure of a viewing-session operation.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A domain-level error (validation, not found, no videos, ...).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A store failure. The operation's transaction has been rolled back.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type SessionResult<T> = Result<T, SessionError>;
