//! Realtime channel configuration

use serde::Deserialize;
use std::time::Duration;
use url::Url;

use super::error::ValidationError;

/// Configuration for the realtime WebSocket channel.
///
/// The reconnect fields describe a capped exponential backoff: the first
/// retry waits `reconnect_base_ms`, each further retry doubles the wait up
/// to `reconnect_cap_ms`, and the connection is abandoned after
/// `reconnect_max_attempts` consecutive failures.
#[derive(Debug, Clone, Deserialize)]
pub struct RealtimeConfig {
    /// WebSocket endpoint, e.g. `wss://api.bazar.kz/ws`.
    pub url: String,

    /// First retry delay in milliseconds.
    #[serde(default = "default_reconnect_base_ms")]
    pub reconnect_base_ms: u64,

    /// Upper bound on the retry delay in milliseconds.
    #[serde(default = "default_reconnect_cap_ms")]
    pub reconnect_cap_ms: u64,

    /// Consecutive failed attempts before giving up.
    #[serde(default = "default_reconnect_max_attempts")]
    pub reconnect_max_attempts: u32,
}

impl RealtimeConfig {
    /// Parse the channel URL, assuming `validate()` has passed.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidRealtimeUrl` if the URL is malformed.
    pub fn parsed_url(&self) -> Result<Url, ValidationError> {
        let url = Url::parse(&self.url).map_err(|_| ValidationError::InvalidRealtimeUrl)?;
        match url.scheme() {
            "ws" | "wss" => Ok(url),
            _ => Err(ValidationError::InvalidRealtimeUrl),
        }
    }

    /// First retry delay.
    pub fn reconnect_base(&self) -> Duration {
        Duration::from_millis(self.reconnect_base_ms)
    }

    /// Retry delay cap.
    pub fn reconnect_cap(&self) -> Duration {
        Duration::from_millis(self.reconnect_cap_ms)
    }

    /// Validate realtime configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.parsed_url()?;
        if self.reconnect_base_ms == 0 {
            return Err(ValidationError::InvalidReconnectBase);
        }
        if self.reconnect_cap_ms < self.reconnect_base_ms {
            return Err(ValidationError::InvalidReconnectCap);
        }
        if self.reconnect_max_attempts == 0 {
            return Err(ValidationError::InvalidReconnectAttempts);
        }
        Ok(())
    }
}

fn default_reconnect_base_ms() -> u64 {
    500
}

fn default_reconnect_cap_ms() -> u64 {
    30_000
}

fn default_reconnect_max_attempts() -> u32 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> RealtimeConfig {
        RealtimeConfig {
            url: "wss://api.bazar.kz/ws".to_string(),
            reconnect_base_ms: 500,
            reconnect_cap_ms: 30_000,
            reconnect_max_attempts: 10,
        }
    }

    #[test]
    fn accepts_wss_url() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn rejects_http_scheme() {
        let mut cfg = valid();
        cfg.url = "https://api.bazar.kz/ws".to_string();
        assert!(matches!(
            cfg.validate(),
            Err(ValidationError::InvalidRealtimeUrl)
        ));
    }

    #[test]
    fn rejects_zero_base_delay() {
        let mut cfg = valid();
        cfg.reconnect_base_ms = 0;
        assert!(matches!(
            cfg.validate(),
            Err(ValidationError::InvalidReconnectBase)
        ));
    }

    #[test]
    fn rejects_cap_below_base() {
        let mut cfg = valid();
        cfg.reconnect_cap_ms = 100;
        assert!(matches!(
            cfg.validate(),
            Err(ValidationError::InvalidReconnectCap)
        ));
    }

    #[test]
    fn rejects_zero_attempt_budget() {
        let mut cfg = valid();
        cfg.reconnect_max_attempts = 0;
        assert!(matches!(
            cfg.validate(),
            Err(ValidationError::InvalidReconnectAttempts)
        ));
    }
}
