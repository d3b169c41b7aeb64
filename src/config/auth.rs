//! Authentication configuration

use serde::Deserialize;

use super::error::ValidationError;

/// OAuth client settings required at boot.
///
/// The token itself arrives per session via [`crate::domain::session::Credentials`];
/// only the public client identifier is boot-time configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// OAuth client identifier issued to this application.
    pub oauth_client_id: String,
}

impl AuthConfig {
    /// Validate auth configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.oauth_client_id.trim().is_empty() {
            return Err(ValidationError::EmptyOauthClientId);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_non_empty_client_id() {
        let cfg = AuthConfig {
            oauth_client_id: "bazar-web".to_string(),
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_blank_client_id() {
        let cfg = AuthConfig {
            oauth_client_id: "   ".to_string(),
        };
        assert!(matches!(
            cfg.validate(),
            Err(ValidationError::EmptyOauthClientId)
        ));
    }
}
