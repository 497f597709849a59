// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Session configuration.

use std::sync::Arc;
use std::time::Duration;

use crate::event::DeviceId;
use crate::scheduler::RefreshPolicy;
use crate::tables::ProtocolTables;

/// Number of leading characters of the model code that identify a model.
const MODEL_PREFIX_LEN: usize = 5;

/// Configuration for one vacuum session.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use robovac_lib::scheduler::RefreshPolicy;
/// use robovac_lib::session::SessionConfig;
///
/// let config = SessionConfig::new("bf7a2c0e51d4c9e2a1xq", "T2267-EU", "f1e2d3c4b5a69788")
///     .with_host("192.168.1.40")
///     .with_name("Living room")
///     .with_policy(RefreshPolicy::new().with_refresh_interval(Duration::from_secs(30)));
///
/// assert_eq!(config.model(), "T2267");
/// assert_eq!(config.host.as_deref(), Some("192.168.1.40"));
/// ```
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Vendor device identifier.
    pub device_id: DeviceId,
    /// Display name.
    pub name: String,
    /// Full model code as reported by the vendor cloud.
    pub model_code: String,
    /// Network address; the session stays unavailable without one.
    pub host: Option<String>,
    /// Local encryption key handed to the transport.
    pub local_key: String,
    /// Per-request timeout enforced by the transport.
    pub timeout: Duration,
    /// Keep-alive interval enforced by the transport.
    pub ping_interval: Duration,
    /// Refresh timings.
    pub policy: RefreshPolicy,
    /// Status, error and mode tables of the model family.
    pub tables: Arc<ProtocolTables>,
}

impl SessionConfig {
    /// Creates a configuration without a network address.
    #[must_use]
    pub fn new(
        device_id: impl Into<DeviceId>,
        model_code: impl Into<String>,
        local_key: impl Into<String>,
    ) -> Self {
        let device_id = device_id.into();
        Self {
            name: device_id.to_string(),
            device_id,
            model_code: model_code.into(),
            host: None,
            local_key: local_key.into(),
            timeout: Duration::from_secs(5),
            ping_interval: Duration::from_secs(10),
            policy: RefreshPolicy::default(),
            tables: Arc::new(ProtocolTables::default()),
        }
    }

    /// Sets the network address.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into()).filter(|host: &String| !host.trim().is_empty());
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the keep-alive interval.
    #[must_use]
    pub fn with_ping_interval(mut self, interval: Duration) -> Self {
        self.ping_interval = interval;
        self
    }

    /// Sets the refresh policy.
    #[must_use]
    pub fn with_policy(mut self, policy: RefreshPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the protocol tables.
    #[must_use]
    pub fn with_tables(mut self, tables: ProtocolTables) -> Self {
        self.tables = Arc::new(tables);
        self
    }

    /// Returns the model prefix transports key their model tables by.
    #[must_use]
    pub fn model(&self) -> &str {
        self.model_code
            .char_indices()
            .nth(MODEL_PREFIX_LEN)
            .map_or(self.model_code.as_str(), |(end, _)| &self.model_code[..end])
    }

    /// Returns true if a network address is configured.
    #[must_use]
    pub fn has_host(&self) -> bool {
        self.host.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SessionConfig::new("vac-1", "T2267", "key");

        assert_eq!(config.name, "vac-1");
        assert!(!config.has_host());
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.policy, RefreshPolicy::default());
    }

    #[test]
    fn model_prefix() {
        assert_eq!(SessionConfig::new("a", "T2267-EU", "k").model(), "T2267");
        assert_eq!(SessionConfig::new("a", "T22", "k").model(), "T22");
        assert_eq!(SessionConfig::new("a", "", "k").model(), "");
    }

    #[test]
    fn blank_host_is_no_host() {
        let config = SessionConfig::new("a", "T2267", "k").with_host("  ");
        assert!(!config.has_host());
    }

    #[test]
    fn custom_tables() {
        let tables = ProtocolTables {
            status: std::collections::HashMap::new(),
            errors: std::collections::HashMap::new(),
            modes: std::collections::HashMap::new(),
        };
        let config = SessionConfig::new("a", "T2267", "k").with_tables(tables);
        assert!(config.tables.status.is_empty());
    }
}
