// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connection health state machine.

use std::fmt;

use serde::Serialize;

/// Coarse connection state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HealthState {
    /// Warm-up has not produced a snapshot yet.
    Starting,
    /// The last poll succeeded.
    Healthy,
    /// Consecutive failed polls, below the failure threshold.
    Degraded(u32),
    /// The device is considered unreachable.
    Unavailable,
}

/// Why a session is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureClass {
    /// Polling failed too many times in a row.
    ConnectionFailed,
    /// The transport does not know the model.
    UnsupportedModel,
    /// No network address was configured.
    MissingAddress,
}

impl FailureClass {
    /// Returns `true` for configuration failures that no poll can clear.
    #[must_use]
    pub const fn is_permanent(self) -> bool {
        matches!(self, Self::UnsupportedModel | Self::MissingAddress)
    }
}

impl fmt::Display for FailureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ConnectionFailed => "connection failed",
            Self::UnsupportedModel => "unsupported model",
            Self::MissingAddress => "missing address",
        })
    }
}

/// Health of one session's connection.
///
/// Transitions:
///
/// - `Starting` stays `Starting` on failure until
///   [`warmup_exhausted`](Self::warmup_exhausted) is called.
/// - `Healthy`/`Degraded(n)` on failure → `Degraded(n + 1)`, or `Unavailable`
///   once the failure threshold is reached.
/// - Any state except a permanent failure → `Healthy` on success.
///
/// # Examples
///
/// ```
/// use robovac_lib::scheduler::{ConnectionHealth, FailureClass, HealthState};
///
/// let mut health = ConnectionHealth::new();
/// health.record_success();
///
/// health.record_failure(3);
/// health.record_failure(3);
/// assert_eq!(health.state(), HealthState::Degraded(2));
///
/// health.record_failure(3);
/// assert_eq!(health.state(), HealthState::Unavailable);
/// assert_eq!(health.failure(), Some(FailureClass::ConnectionFailed));
///
/// health.record_success();
/// assert!(health.is_available());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionHealth {
    state: HealthState,
    consecutive_failures: u32,
    failure: Option<FailureClass>,
}

impl ConnectionHealth {
    /// Creates a health record in the `Starting` state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: HealthState::Starting,
            consecutive_failures: 0,
            failure: None,
        }
    }

    /// Creates a health record that is unavailable for good.
    #[must_use]
    pub fn permanent(class: FailureClass) -> Self {
        Self {
            state: HealthState::Unavailable,
            consecutive_failures: 0,
            failure: Some(class),
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> HealthState {
        self.state
    }

    /// Returns the number of failed polls since the last success.
    #[must_use]
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Returns the failure classification, if unavailable.
    #[must_use]
    pub fn failure(&self) -> Option<FailureClass> {
        self.failure
    }

    /// Returns `true` unless the session is unavailable.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.state != HealthState::Unavailable
    }

    /// Returns `true` if the session failed for a configuration reason.
    #[must_use]
    pub fn is_permanent(&self) -> bool {
        self.failure.is_some_and(FailureClass::is_permanent)
    }

    /// Records a successful poll.
    pub fn record_success(&mut self) {
        if self.is_permanent() {
            return;
        }
        self.state = HealthState::Healthy;
        self.consecutive_failures = 0;
        self.failure = None;
    }

    /// Records a failed poll.
    pub fn record_failure(&mut self, threshold: u32) {
        if self.is_permanent() {
            return;
        }
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);

        match self.state {
            HealthState::Starting | HealthState::Unavailable => {}
            HealthState::Healthy | HealthState::Degraded(_) => {
                if self.consecutive_failures >= threshold {
                    self.state = HealthState::Unavailable;
                    self.failure = Some(FailureClass::ConnectionFailed);
                } else {
                    self.state = HealthState::Degraded(self.consecutive_failures);
                }
            }
        }
    }

    /// Marks warm-up as failed: every attempt errored.
    pub fn warmup_exhausted(&mut self) {
        if self.state == HealthState::Starting {
            self.state = HealthState::Unavailable;
            self.failure = Some(FailureClass::ConnectionFailed);
        }
    }
}

impl Default for ConnectionHealth {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn healthy() -> ConnectionHealth {
        let mut health = ConnectionHealth::new();
        health.record_success();
        health
    }

    #[test]
    fn starts_available() {
        let health = ConnectionHealth::new();
        assert_eq!(health.state(), HealthState::Starting);
        assert!(health.is_available());
        assert_eq!(health.failure(), None);
    }

    #[test]
    fn three_failures_make_unavailable() {
        let mut health = healthy();

        health.record_failure(3);
        assert_eq!(health.state(), HealthState::Degraded(1));
        health.record_failure(3);
        assert_eq!(health.state(), HealthState::Degraded(2));
        assert!(health.is_available());

        health.record_failure(3);
        assert_eq!(health.state(), HealthState::Unavailable);
        assert_eq!(health.failure(), Some(FailureClass::ConnectionFailed));
        assert!(!health.is_available());
    }

    #[test]
    fn success_resets_counter() {
        let mut health = healthy();
        health.record_failure(3);
        health.record_failure(3);
        health.record_success();
        assert_eq!(health.consecutive_failures(), 0);

        health.record_failure(3);
        assert_eq!(health.state(), HealthState::Degraded(1));
    }

    #[test]
    fn unavailable_is_sticky_until_success() {
        let mut health = healthy();
        for _ in 0..5 {
            health.record_failure(3);
        }
        assert_eq!(health.state(), HealthState::Unavailable);
        assert_eq!(health.consecutive_failures(), 5);

        health.record_success();
        assert_eq!(health.state(), HealthState::Healthy);
        assert_eq!(health.failure(), None);
    }

    #[test]
    fn warmup_failures_stay_starting() {
        let mut health = ConnectionHealth::new();
        for _ in 0..5 {
            health.record_failure(3);
        }
        assert_eq!(health.state(), HealthState::Starting);

        health.warmup_exhausted();
        assert_eq!(health.state(), HealthState::Unavailable);
        assert_eq!(health.failure(), Some(FailureClass::ConnectionFailed));
    }

    #[test]
    fn warmup_exhausted_after_success_is_ignored() {
        let mut health = healthy();
        health.warmup_exhausted();
        assert_eq!(health.state(), HealthState::Healthy);
    }

    #[test]
    fn permanent_failures_never_recover() {
        let mut health = ConnectionHealth::permanent(FailureClass::MissingAddress);
        assert!(health.is_permanent());

        health.record_success();
        assert_eq!(health.state(), HealthState::Unavailable);
        assert_eq!(health.failure(), Some(FailureClass::MissingAddress));
    }

    #[test]
    fn failure_class_display() {
        assert_eq!(FailureClass::ConnectionFailed.to_string(), "connection failed");
        assert!(FailureClass::UnsupportedModel.is_permanent());
        assert!(!FailureClass::ConnectionFailed.is_permanent());
    }
}
