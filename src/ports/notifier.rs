//! Notifier port - Transient user-facing notices.
//!
//! Mutation failures and rollbacks surface to the user as short messages.
//! Delivery sits behind a port so embedders decide how a notice is rendered
//! (toast, status bar, log line).

use std::fmt;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// One transient notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    /// Informational notice.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    /// Success notice.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            message: message.into(),
        }
    }

    /// Failure notice.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Error => "error",
        };
        write!(f, "[{}] {}", level, self.message)
    }
}

/// Port for delivering notices to the user.
pub trait Notifier: Send + Sync {
    /// Deliver one notice. Must not block.
    fn notify(&self, notice: Notice);
}
