//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("API base URL is not a valid http(s) URL")]
    InvalidApiBaseUrl,

    #[error("Realtime URL is not a valid ws(s) URL")]
    InvalidRealtimeUrl,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Reconnect base delay must be non-zero")]
    InvalidReconnectBase,

    #[error("Reconnect delay cap must be at least the base delay")]
    InvalidReconnectCap,

    #[error("Reconnect attempt budget must be non-zero")]
    InvalidReconnectAttempts,

    #[error("OAuth client id cannot be empty")]
    EmptyOauthClientId,
}
