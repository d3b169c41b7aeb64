//! Session identity module.
//!
//! A session is the unit of realtime access: one authenticated principal
//! (token + role) owning at most one live channel. Shop principals carry
//! moderation flags; a shop that is unapproved or deactivated is denied the
//! realtime channel entirely.

use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role the session authenticates as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Shop,
    Admin,
}

impl Role {
    /// Returns the wire representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Shop => "shop",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Moderation flags for a shop account.
///
/// Both flags must be true before a shop session is granted a realtime
/// channel; unapproved or deactivated shops fall back to plain request/response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopAccess {
    pub is_approved: bool,
    pub is_active: bool,
}

impl ShopAccess {
    /// Whether this shop may hold a realtime channel.
    pub fn channel_allowed(&self) -> bool {
        self.is_approved && self.is_active
    }
}

/// Bearer token for the current session.
///
/// Wrapped in [`Secret`] so the token never appears in `Debug` output or
/// log fields.
#[derive(Clone)]
pub struct AccessToken(Secret<String>);

impl AccessToken {
    /// Wraps a raw token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(Secret::new(token.into()))
    }

    /// Exposes the raw token for transport headers and URLs.
    pub fn reveal(&self) -> &str {
        self.0.expose_secret()
    }
}

impl PartialEq for AccessToken {
    fn eq(&self, other: &Self) -> bool {
        self.0.expose_secret() == other.0.expose_secret()
    }
}

impl Eq for AccessToken {}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

/// Credentials identifying one authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: AccessToken,
    pub role: Role,

    /// Moderation flags, required when `role == Role::Shop`.
    pub shop_access: Option<ShopAccess>,
}

impl Credentials {
    /// Credentials for a regular user session.
    pub fn user(token: impl Into<String>) -> Self {
        Self {
            token: AccessToken::new(token),
            role: Role::User,
            shop_access: None,
        }
    }

    /// Credentials for a shop session with its moderation flags.
    pub fn shop(token: impl Into<String>, access: ShopAccess) -> Self {
        Self {
            token: AccessToken::new(token),
            role: Role::Shop,
            shop_access: Some(access),
        }
    }

    /// Credentials for an admin session.
    pub fn admin(token: impl Into<String>) -> Self {
        Self {
            token: AccessToken::new(token),
            role: Role::Admin,
            shop_access: None,
        }
    }

    /// Whether this principal may hold a realtime channel.
    ///
    /// Users and admins always may. Shops require `is_approved && is_active`;
    /// a shop with missing flags is treated as denied.
    pub fn channel_allowed(&self) -> bool {
        match self.role {
            Role::Shop => self
                .shop_access
                .map_or(false, |access| access.channel_allowed()),
            Role::User | Role::Admin => true,
        }
    }
}
