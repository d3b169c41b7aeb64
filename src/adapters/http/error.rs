//! API error types with client/server bucketing.

use thiserror::Error;

/// Errors raised by the REST API client.
///
/// Failures are normalized to a message string for presentation; the only
/// structure preserved is the client-error vs server-error bucket by HTTP
/// status range, which is all that callers branch on.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("request failed: {0}")]
    Network(String),

    /// 4xx response.
    #[error("{message}")]
    Client { status: u16, message: String },

    /// 5xx (or otherwise non-success) response.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// 2xx response whose body did not match the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Buckets a non-success status into `Client` or `Server`.
    pub fn from_status(status: u16, message: String) -> Self {
        if (400..500).contains(&status) {
            ApiError::Client { status, message }
        } else {
            ApiError::Server { status, message }
        }
    }

    /// Whether this is a 4xx failure.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ApiError::Client { .. })
    }

    /// Whether this is a 5xx failure.
    pub fn is_server_error(&self) -> bool {
        matches!(self, ApiError::Server { .. })
    }

    /// HTTP status, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Client { status, .. } | ApiError::Server { status, .. } => Some(*status),
            ApiError::Network(_) | ApiError::Decode(_) => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_400_buckets_as_client() {
        let err = ApiError::from_status(404, "not found".to_string());
        assert!(err.is_client_error());
        assert!(!err.is_server_error());
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn status_500_buckets_as_server() {
        let err = ApiError::from_status(503, "unavailable".to_string());
        assert!(err.is_server_error());
        assert_eq!(err.status(), Some(503));
    }

    #[test]
    fn odd_status_buckets_as_server() {
        // Anything outside 4xx lands in the server bucket.
        let err = ApiError::from_status(302, "redirect".to_string());
        assert!(err.is_server_error());
    }

    #[test]
    fn display_is_the_normalized_message() {
        let err = ApiError::from_status(422, "name is required".to_string());
        assert_eq!(err.to_string(), "name is required");
    }

    #[test]
    fn network_error_has_no_status() {
        let err = ApiError::Network("timed out".to_string());
        assert_eq!(err.status(), None);
    }
}
