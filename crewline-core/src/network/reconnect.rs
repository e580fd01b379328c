// SPDX-FileCopyrightText: 2026 Crewline Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Reconnection Policy
//!
//! Pure backoff state machine for the push-stream transport. The long-poll
//! transport deliberately uses a flat retry delay instead and never goes
//! through this policy.

use std::time::Duration;

/// Backoff settings for stream reconnects.
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// First wait after a failure, in milliseconds.
    pub initial_delay_ms: f64,
    /// Multiplier applied after each returned delay.
    pub backoff_factor: f64,
    /// Upper bound on the wait, in milliseconds.
    pub max_delay_ms: f64,
    /// Number of delays handed out before giving up.
    pub max_attempts: u32,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        ReconnectConfig {
            initial_delay_ms: 5_000.0,
            backoff_factor: 1.5,
            max_delay_ms: 300_000.0,
            max_attempts: 5,
        }
    }
}

/// Bounded exponential backoff with a terminal give-up.
///
/// Delay arithmetic stays in `f64` milliseconds so fractional delays are
/// exact; conversion to `Duration` happens only at the sleep site.
#[derive(Debug, Clone)]
pub struct ReconnectPolicy {
    config: ReconnectConfig,
    attempts: u32,
    delay_ms: f64,
}

impl ReconnectPolicy {
    /// Creates a policy at its initial state.
    pub fn new(config: ReconnectConfig) -> Self {
        let delay_ms = config.initial_delay_ms;
        ReconnectPolicy {
            config,
            attempts: 0,
            delay_ms,
        }
    }

    /// Returns the next wait, or `None` once the attempt budget is spent.
    ///
    /// The current delay is handed out, then advanced:
    /// `delay = min(delay * factor, max)`.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.attempts >= self.config.max_attempts {
            return None;
        }
        let current = self.delay_ms;
        self.delay_ms = (self.delay_ms * self.config.backoff_factor).min(self.config.max_delay_ms);
        self.attempts += 1;
        Some(Duration::from_secs_f64(current / 1000.0))
    }

    /// Restores the initial state. Called on any successful (re)connection.
    pub fn reset(&mut self) {
        self.attempts = 0;
        self.delay_ms = self.config.initial_delay_ms;
    }

    /// Failures consumed since the last reset.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Returns true once `next_delay` would give up.
    pub fn exhausted(&self) -> bool {
        self.attempts >= self.config.max_attempts
    }
}
