//! Response envelope normalization.
//!
//! The backend is inconsistent about its success envelope: some endpoints
//! return `{ "data": ..., "message": ... }`, others return the value bare.
//! Both shapes are accepted here so callers always receive the inner value;
//! the inconsistency never propagates past this boundary.

use serde::Deserialize;

/// A response body in either envelope shape.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    /// `{ "data": T, "message": "..." }`
    Wrapped {
        data: T,
        #[serde(default)]
        message: Option<String>,
    },

    /// Bare `T`.
    Bare(T),
}

impl<T> Envelope<T> {
    /// Unwraps the inner value regardless of shape.
    pub fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data, .. } => data,
            Envelope::Bare(value) => value,
        }
    }

    /// Optional server message (wrapped shape only).
    pub fn message(&self) -> Option<&str> {
        match self {
            Envelope::Wrapped { message, .. } => message.as_deref(),
            Envelope::Bare(_) => None,
        }
    }
}

/// Error body shapes observed across endpoints.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

/// Extracts a human-readable message from an error response body.
///
/// Tries the known error body fields in order; falls back to the status
/// line when the body is empty or not JSON.
pub(super) fn error_message(body: &str, status: u16) -> String {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    parsed
        .message
        .or(parsed.error)
        .or(parsed.detail)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("request failed with status {}", status))
}
