// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Raw data-point values as they travel over the wire.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Raw key/value snapshot reported by the device.
///
/// Keys are the device's opaque data-point identifiers (usually small decimal
/// numbers such as `"152"`). A snapshot is replaced wholesale on every refresh.
pub type RawSnapshot = BTreeMap<String, WireValue>;

/// A single data-point value.
///
/// Opaque binary blobs travel as base64 [`WireValue::Text`].
///
/// # Examples
///
/// ```
/// use robovac_lib::protocol::WireValue;
///
/// let v: WireValue = serde_json::from_str("85").unwrap();
/// assert_eq!(v.as_integer(), Some(85));
///
/// let v: WireValue = serde_json::from_str("\"85\"").unwrap();
/// assert_eq!(v.as_integer(), Some(85));
///
/// let v: WireValue = serde_json::from_str("true").unwrap();
/// assert!(v.is_truthy());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireValue {
    /// Boolean data point.
    Bool(bool),
    /// Integer data point.
    Integer(i64),
    /// Floating point data point.
    Float(f64),
    /// Text or base64-encoded blob.
    Text(String),
}

impl WireValue {
    /// Interprets the value as an integer.
    ///
    /// Integral floats and numeric text are accepted; anything else is `None`.
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            // Safe: only integral values inside the i64 range are converted
            #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
            Self::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Some(*f as i64),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Bool(_) | Self::Float(_) => None,
        }
    }

    /// Returns the text content, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Interprets the value the way the device firmware does for switches.
    ///
    /// `false`, zero, the empty string, `"0"` and `"false"` are falsy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Integer(n) => *n != 0,
            Self::Float(f) => *f != 0.0,
            Self::Text(s) => {
                let s = s.trim();
                !(s.is_empty() || s == "0" || s.eq_ignore_ascii_case("false"))
            }
        }
    }

    /// Returns `true` if this value is numerically zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Integer(n) => *n == 0,
            Self::Float(f) => *f == 0.0,
            Self::Text(s) => s.trim() == "0",
            Self::Bool(_) => false,
        }
    }
}

impl fmt::Display for WireValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for WireValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for WireValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for WireValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for WireValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// One write of a value to a data point.
#[derive(Debug, Clone, PartialEq)]
pub struct DpWrite {
    /// The wire key.
    pub key: String,
    /// The value to write.
    pub value: WireValue,
}

impl DpWrite {
    /// Creates a write of `value` to `key`.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<WireValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Converts the write into the single-entry mapping the transport accepts.
    #[must_use]
    pub fn into_snapshot(self) -> RawSnapshot {
        RawSnapshot::from([(self.key, self.value)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_device_payload() {
        let json = r#"{"152":"AggN","163":85,"160":false,"6":12.0}"#;
        let snapshot: RawSnapshot = serde_json::from_str(json).unwrap();

        assert_eq!(snapshot["152"], WireValue::Text("AggN".to_string()));
        assert_eq!(snapshot["163"], WireValue::Integer(85));
        assert_eq!(snapshot["160"], WireValue::Bool(false));
        assert_eq!(snapshot["6"].as_integer(), Some(12));
    }

    #[test]
    fn as_integer_rejects_non_numeric() {
        assert_eq!(WireValue::from("abc").as_integer(), None);
        assert_eq!(WireValue::Bool(true).as_integer(), None);
        assert_eq!(WireValue::Float(1.5).as_integer(), None);
        assert_eq!(WireValue::from(" 42 ").as_integer(), Some(42));
    }

    #[test]
    fn truthiness() {
        assert!(WireValue::Bool(true).is_truthy());
        assert!(!WireValue::Bool(false).is_truthy());
        assert!(!WireValue::from("").is_truthy());
        assert!(!WireValue::from("false").is_truthy());
        assert!(WireValue::from("AggN").is_truthy());
        assert!(!WireValue::Integer(0).is_truthy());
    }

    #[test]
    fn zero_detection() {
        assert!(WireValue::Integer(0).is_zero());
        assert!(WireValue::from("0").is_zero());
        assert!(!WireValue::from("no_error").is_zero());
        assert!(!WireValue::Bool(false).is_zero());
    }

    #[test]
    fn write_into_snapshot() {
        let snapshot = DpWrite::new("135", true).into_snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot["135"], WireValue::Bool(true));
    }

    #[test]
    fn serializes_untagged() {
        let json = serde_json::to_string(&WireValue::from("MEQ4MDAwMDAw")).unwrap();
        assert_eq!(json, r#""MEQ4MDAwMDAw""#);
    }
}
