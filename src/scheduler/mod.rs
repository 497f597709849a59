// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Refresh scheduling policy and connection health.
//!
//! The session runs a warm-up phase followed by periodic polling. The
//! [`RefreshPolicy`] sets the timings and the failure threshold, and
//! [`ConnectionHealth`] tracks the outcome of every poll.

mod health;

pub use health::{ConnectionHealth, FailureClass, HealthState};

use std::time::Duration;

/// Timings for warm-up and periodic polling.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use robovac_lib::scheduler::RefreshPolicy;
///
/// let policy = RefreshPolicy::default();
/// assert_eq!(policy.refresh_interval, Duration::from_secs(20));
/// assert_eq!(policy.warmup_attempts, 5);
///
/// let policy = RefreshPolicy::new()
///     .with_refresh_interval(Duration::from_secs(60))
///     .with_failure_threshold(5);
/// assert_eq!(policy.failure_threshold, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshPolicy {
    /// Interval between periodic polls.
    pub refresh_interval: Duration,
    /// Number of warm-up polls before giving up.
    pub warmup_attempts: u32,
    /// Delay between warm-up polls.
    pub warmup_delay: Duration,
    /// Consecutive failed polls after which the session is unavailable.
    pub failure_threshold: u32,
}

impl RefreshPolicy {
    /// Creates a policy with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the interval between periodic polls.
    #[must_use]
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// Sets the number of warm-up polls.
    #[must_use]
    pub fn with_warmup_attempts(mut self, attempts: u32) -> Self {
        self.warmup_attempts = attempts.max(1);
        self
    }

    /// Sets the delay between warm-up polls.
    #[must_use]
    pub fn with_warmup_delay(mut self, delay: Duration) -> Self {
        self.warmup_delay = delay;
        self
    }

    /// Sets the failure threshold.
    #[must_use]
    pub fn with_failure_threshold(mut self, threshold: u32) -> Self {
        self.failure_threshold = threshold.max(1);
        self
    }

    /// Returns true if another warm-up attempt should be made.
    #[must_use]
    pub fn should_retry_warmup(&self, attempt: u32) -> bool {
        attempt < self.warmup_attempts
    }
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(20),
            warmup_attempts: 5,
            warmup_delay: Duration::from_millis(1500),
            failure_threshold: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy() {
        let policy = RefreshPolicy::default();
        assert_eq!(policy.warmup_delay, Duration::from_millis(1500));
        assert_eq!(policy.failure_threshold, 3);
    }

    #[test]
    fn warmup_attempts_bound_retries() {
        let policy = RefreshPolicy::new().with_warmup_attempts(2);
        assert!(policy.should_retry_warmup(0));
        assert!(policy.should_retry_warmup(1));
        assert!(!policy.should_retry_warmup(2));
    }

    #[test]
    fn zero_values_are_clamped() {
        let policy = RefreshPolicy::new()
            .with_failure_threshold(0)
            .with_warmup_attempts(0);
        assert_eq!(policy.failure_threshold, 1);
        assert_eq!(policy.warmup_attempts, 1);
    }

    #[test]
    fn builder_sets_delays() {
        let policy = RefreshPolicy::new()
            .with_refresh_interval(Duration::from_secs(5))
            .with_warmup_delay(Duration::from_millis(10));
        assert_eq!(policy.refresh_interval, Duration::from_secs(5));
        assert_eq!(policy.warmup_delay, Duration::from_millis(10));
    }
}
