//! Error taxonomy for session and realtime channel operations.

use thiserror::Error;

/// Errors surfaced by the sync session and connection manager.
///
/// Per-attempt connection failures are logged rather than surfaced; callers
/// only see an error once the retry budget is exhausted or the client cannot
/// be constructed at all.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The realtime channel could not be established within the retry budget.
    #[error("realtime channel unavailable after {attempts} attempts: {last_error}")]
    ConnectExhausted { attempts: u32, last_error: String },

    /// The client could not be constructed (malformed base URL, HTTP client
    /// build failure).
    #[error("client initialization failed: {0}")]
    Init(String),
}

impl SyncError {
    /// Creates an initialization error from any displayable cause.
    pub fn init(cause: impl std::fmt::Display) -> Self {
        SyncError::Init(cause.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_exhausted_includes_attempt_count() {
        let err = SyncError::ConnectExhausted {
            attempts: 5,
            last_error: "connection refused".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("5 attempts"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn init_wraps_displayable_cause() {
        let err = SyncError::init("bad base url");
        assert_eq!(err.to_string(), "client initialization failed: bad base url");
    }
}
