//! # Framework Errors
//!
//! Errors raised by remote calls and by the cache actor itself. Remote errors are never
//! recovered locally: the actor rolls back its optimistic step and hands them back
//! unchanged inside [`CacheError::Remote`].

/// Failure of a single remote call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RemoteError {
    /// No response was received.
    #[error("Transport error: {0}")]
    Transport(String),
    /// Non-2xx status with no more specific meaning, or an undecodable body.
    #[error("Server error ({}): {message}", status_text(.status))]
    Server { status: Option<u16>, message: String },
    /// The server rejected the payload.
    #[error("Validation error ({status}): {message}")]
    Validation { status: u16, message: String },
    /// The addressed entity does not exist server-side.
    #[error("Not found: {0}")]
    NotFound(String),
}

fn status_text(status: &Option<u16>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "no status".to_string(),
    }
}

/// Errors surfaced by [`CacheClient`](crate::framework::CacheClient).
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    /// A newer load was applied before this one completed.
    #[error("Load superseded by a newer load")]
    Superseded,
    /// The placeholder this mutation targeted was rolled back.
    #[error("Placeholder {0} was rolled back before the mutation could run")]
    Abandoned(String),
    /// The id is a placeholder with no pending create behind it.
    #[error("Entry {0} has not been confirmed by the server")]
    Unconfirmed(String),
}

impl CacheError {
    /// The remote error behind this failure, if any.
    pub fn remote(&self) -> Option<&RemoteError> {
        match self {
            CacheError::Remote(e) => Some(e),
            _ => None,
        }
    }
}
