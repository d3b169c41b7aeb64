//! Notifier adapters.
//!
//! `TracingNotifier` is the default sink for embedders without a UI surface;
//! `RecordingNotifier` captures notices for test assertions.

use std::sync::Mutex;

use crate::ports::{Notice, Notifier, Severity};

/// Notifier that forwards notices to the tracing subscriber.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl TracingNotifier {
    /// Creates the notifier.
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.severity {
            Severity::Info | Severity::Success => tracing::info!(message = %notice.message, "notice"),
            Severity::Error => tracing::error!(message = %notice.message, "notice"),
        }
    }
}

/// Notifier that records notices for assertions.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All notices delivered so far.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Whether any error notice was delivered.
    pub fn has_error(&self) -> bool {
        self.notices()
            .iter()
            .any(|n| n.severity == Severity::Error)
    }

    /// Clears recorded notices (test isolation).
    pub fn clear(&self) {
        self.notices
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(notice);
    }
}
