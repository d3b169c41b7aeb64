//! Reconnect backoff policy.
//!
//! Reconnection is a client concern: capped exponential backoff with a
//! bounded attempt budget. Attempts are numbered from zero; `delay_for(0)`
//! is the wait before the first retry.

use std::time::Duration;

use crate::config::RealtimeConfig;

/// Capped exponential backoff with a fixed attempt budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    base: Duration,
    cap: Duration,
    max_attempts: u32,
}

impl BackoffPolicy {
    /// Creates a policy from explicit bounds.
    pub fn new(base: Duration, cap: Duration, max_attempts: u32) -> Self {
        Self {
            base,
            cap,
            max_attempts,
        }
    }

    /// Builds the policy from validated realtime configuration.
    pub fn from_config(config: &RealtimeConfig) -> Self {
        Self::new(
            config.reconnect_base(),
            config.reconnect_cap(),
            config.reconnect_max_attempts,
        )
    }

    /// Delay before retry number `attempt`, or `None` once the budget is
    /// exhausted.
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_attempts {
            return None;
        }
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        let delay = self.base.checked_mul(factor).unwrap_or(self.cap);
        Some(delay.min(self.cap))
    }

    /// Total attempts allowed.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}
