//! REST API configuration

use serde::Deserialize;
use url::Url;

use super::error::ValidationError;

/// Configuration for the REST API client.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the backend API, e.g. `https://api.bazar.kz/api/v1`.
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl ApiConfig {
    /// Parse the base URL, assuming `validate()` has passed.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidApiBaseUrl` if the URL is malformed.
    pub fn parsed_base_url(&self) -> Result<Url, ValidationError> {
        let url = Url::parse(&self.base_url).map_err(|_| ValidationError::InvalidApiBaseUrl)?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            _ => Err(ValidationError::InvalidApiBaseUrl),
        }
    }

    /// Validate API configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.parsed_base_url()?;
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

fn default_request_timeout() -> u64 {
    30
}
