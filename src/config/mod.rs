//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment
//! variables using the `config` and `dotenvy` crates. Configuration is loaded
//! with the `BAZAR_SYNC_` prefix and nested values use underscores as
//! separators. Values are validated eagerly at boot: a malformed base URL or
//! realtime endpoint fails fast instead of surfacing mid-session.
//!
//! # Example
//!
//! ```no_run
//! use bazar_sync::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod api;
mod auth;
mod error;
mod realtime;

pub use api::ApiConfig;
pub use auth::AuthConfig;
pub use error::{ConfigError, ValidationError};
pub use realtime::RealtimeConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// REST API configuration (base URL, timeouts)
    pub api: ApiConfig,

    /// Realtime channel configuration (endpoint, reconnect policy)
    pub realtime: RealtimeConfig,

    /// OAuth configuration (client identifier)
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with the `BAZAR_SYNC` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `BAZAR_SYNC__API__BASE_URL=https://...` -> `api.base_url`
    /// - `BAZAR_SYNC__REALTIME__URL=wss://...` -> `realtime.url`
    /// - `BAZAR_SYNC__AUTH__OAUTH_CLIENT_ID=...` -> `auth.oauth_client_id`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("BAZAR_SYNC")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.api.validate()?;
        self.realtime.validate()?;
        self.auth.validate()?;
        Ok(())
    }
}
