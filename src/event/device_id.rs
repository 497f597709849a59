// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device identifier type.

use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

/// Identifier of a vacuum, as assigned by the vendor cloud.
///
/// A distinct type so device ids are not confused with local keys or wire
/// keys, which are plain strings too. Cloning is cheap.
///
/// # Examples
///
/// ```
/// use robovac_lib::event::DeviceId;
///
/// let id = DeviceId::new("bf7a2c0e51d4c9e2a1xq");
/// assert_eq!(id.as_str(), "bf7a2c0e51d4c9e2a1xq");
/// assert_eq!(format!("{id:?}"), "DeviceId(bf7a2c0e...)");
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct DeviceId(Arc<str>);

impl DeviceId {
    /// Creates a device identifier.
    #[must_use]
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    /// Returns the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Show only the first 8 characters of long ids
        match self.0.get(..8) {
            Some(short) if short.len() < self.0.len() => write!(f, "DeviceId({short}...)"),
            _ => write!(f, "DeviceId({})", self.0),
        }
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for DeviceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl From<&str> for DeviceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DeviceId {
    fn from(id: String) -> Self {
        Self(Arc::from(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_by_value() {
        assert_eq!(DeviceId::new("abc"), DeviceId::from("abc".to_string()));
        assert_ne!(DeviceId::new("abc"), DeviceId::new("abd"));
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&DeviceId::new("bf7a2c0e51d4c9e2a1xq")).unwrap();
        assert_eq!(json, r#""bf7a2c0e51d4c9e2a1xq""#);
    }

    #[test]
    fn short_ids_are_shown_whole() {
        assert_eq!(format!("{:?}", DeviceId::new("abc")), "DeviceId(abc)");
        assert_eq!(DeviceId::new("abc").to_string(), "abc");
    }
}
