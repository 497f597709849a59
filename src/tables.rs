// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Static protocol tables.
//!
//! The device reports its work status, errors, and work mode as opaque
//! base64 protobuf fragments. These tables map the known fragments to
//! canonical values. They are plain data: the built-in set covers the L60
//! family, and a different set can be loaded from JSON for another model.
//!
//! Unknown codes never fail a lookup; callers get `None` and resolve it to an
//! explicit "unknown" value.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Intermediate work status code.
///
/// This is the first stage of status decoding: wire blob → `StatusCode`.
/// The second stage, [`StatusCode::label`], yields the canonical label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusCode {
    /// Automatic cleaning.
    Auto,
    /// Locating itself before cleaning.
    Position,
    /// Automatic cleaning paused.
    Pause,
    /// Cleaning selected rooms.
    Room,
    /// Locating itself before a room clean.
    RoomPosition,
    /// Room clean paused.
    RoomPause,
    /// Spot cleaning.
    Spot,
    /// Locating itself before a spot clean.
    SpotPosition,
    /// Spot clean paused.
    SpotPause,
    /// Manual driving.
    StartManual,
    /// Heading back to the dock.
    GoingToCharge,
    /// Charging on the dock.
    Charging,
    /// Run finished, on the dock.
    Completed,
    /// Idle, awake.
    Standby,
    /// Idle, asleep.
    Sleeping,
}

impl StatusCode {
    /// Returns the canonical status label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Auto => "Auto cleaning",
            Self::Position => "Positioning",
            Self::Pause => "Cleaning paused",
            Self::Room => "Cleaning room",
            Self::RoomPosition => "Positioning room",
            Self::RoomPause => "Cleaning room paused",
            Self::Spot => "Spot cleaning",
            Self::SpotPosition => "Positioning spot",
            Self::SpotPause => "Cleaning spot paused",
            Self::StartManual => "Manual mode",
            Self::GoingToCharge => "Recharge",
            Self::Charging => "Charging",
            Self::Completed => "Completed",
            Self::Standby => "Standby",
            Self::Sleeping => "Sleeping",
        }
    }

    /// Returns `true` for the paused variants of every cleaning run.
    #[must_use]
    pub const fn is_paused(self) -> bool {
        matches!(self, Self::Pause | Self::RoomPause | Self::SpotPause)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Canonical label the error table uses for "no fault".
pub const NO_ERROR_LABEL: &str = "no_error";

/// Status, error, and mode tables for one model family.
///
/// # Examples
///
/// ```
/// use robovac_lib::tables::{ProtocolTables, StatusCode};
///
/// let tables = ProtocolTables::default();
/// assert_eq!(tables.status("BBADGgA="), Some(StatusCode::Charging));
/// assert_eq!(tables.status("bogus"), None);
/// assert_eq!(tables.mode_label("AggN"), Some("Pause"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolTables {
    /// Status wire blob → intermediate status code.
    pub status: HashMap<String, StatusCode>,
    /// Error wire blob → canonical error label.
    pub errors: HashMap<String, String>,
    /// Mode wire blob → mode label.
    pub modes: HashMap<String, String>,
}

impl ProtocolTables {
    /// Loads tables from a JSON document with `status`, `errors` and `modes`
    /// objects.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Json` if the document is malformed or names an
    /// unknown status code.
    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        serde_json::from_str(json).map_err(Into::into)
    }

    /// Looks up the intermediate status code for a wire blob.
    #[must_use]
    pub fn status(&self, raw: &str) -> Option<StatusCode> {
        self.status.get(raw).copied()
    }

    /// Looks up the canonical error label for a wire blob.
    #[must_use]
    pub fn error_label(&self, raw: &str) -> Option<&str> {
        self.errors.get(raw).map(String::as_str)
    }

    /// Looks up the label of a work mode blob.
    #[must_use]
    pub fn mode_label(&self, raw: &str) -> Option<&str> {
        self.modes.get(raw).map(String::as_str)
    }

    /// Built-in tables for the L60 family.
    #[must_use]
    pub fn l60() -> Self {
        let status = [
            ("BgoAEAUyAA==", StatusCode::Auto),
            ("BgoAEAVSAA==", StatusCode::Position),
            ("CAoAEAUyAggB", StatusCode::Pause),
            ("CAoCCAEQBTIA", StatusCode::Room),
            ("CAoCCAEQBVIA", StatusCode::RoomPosition),
            ("CgoCCAEQBTICCAE=", StatusCode::RoomPause),
            ("CAoCCAIQBTIA", StatusCode::Spot),
            ("CAoCCAIQBVIA", StatusCode::SpotPosition),
            ("CgoCCAIQBTICCAE=", StatusCode::SpotPause),
            ("BAoAEAY=", StatusCode::StartManual),
            ("BBAHQgA=", StatusCode::GoingToCharge),
            ("BBADGgA=", StatusCode::Charging),
            ("BhADGgIIAQ==", StatusCode::Completed),
            ("AA==", StatusCode::Standby),
            ("AhAB", StatusCode::Sleeping),
        ];

        // Several "no error" blobs exist because each embeds a timestamp.
        let errors = [
            ("DAiI6suO9dXszgFSAA==", NO_ERROR_LABEL),
            ("FAjwudWorOPszgEaAqURUgQSAqUR", "Sidebrush stuck"),
            ("FAj+nMu7zuPszgEaAtg2UgQSAtg2", "Robot stuck"),
            ("DAjtzbfps+XszgFSAA==", NO_ERROR_LABEL),
            ("DAiom9rd6eTszgFSAA==", NO_ERROR_LABEL),
            ("DAia8JTV5OPszgFSAA==", NO_ERROR_LABEL),
            ("DAj489bWsePszgFSAA==", NO_ERROR_LABEL),
        ];

        let modes = [
            ("AggO", "Auto cleaning"),
            ("BBoCCAE=", "Start auto"),
            ("AggN", "Pause"),
            ("AggG", "Stop / Go to charge"),
            ("AA==", "Standby"),
        ];

        Self {
            status: status
                .into_iter()
                .map(|(raw, code)| (raw.to_string(), code))
                .collect(),
            errors: errors
                .into_iter()
                .map(|(raw, label)| (raw.to_string(), label.to_string()))
                .collect(),
            modes: modes
                .into_iter()
                .map(|(raw, label)| (raw.to_string(), label.to_string()))
                .collect(),
        }
    }
}

impl Default for ProtocolTables {
    fn default() -> Self {
        Self::l60()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_stage_status_lookup() {
        let tables = ProtocolTables::default();
        let code = tables.status("BBAHQgA=").unwrap();
        assert_eq!(code, StatusCode::GoingToCharge);
        assert_eq!(code.label(), "Recharge");
    }

    #[test]
    fn every_l60_status_has_a_label() {
        let tables = ProtocolTables::l60();
        assert_eq!(tables.status.len(), 15);
        for code in tables.status.values() {
            assert!(!code.label().is_empty());
        }
    }

    #[test]
    fn error_lookup() {
        let tables = ProtocolTables::default();
        assert_eq!(
            tables.error_label("FAj+nMu7zuPszgEaAtg2UgQSAtg2"),
            Some("Robot stuck")
        );
        assert_eq!(
            tables.error_label("DAjtzbfps+XszgFSAA=="),
            Some(NO_ERROR_LABEL)
        );
        assert_eq!(tables.error_label("unknown"), None);
    }

    #[test]
    fn pause_variants() {
        assert!(StatusCode::Pause.is_paused());
        assert!(StatusCode::RoomPause.is_paused());
        assert!(StatusCode::SpotPause.is_paused());
        assert!(!StatusCode::Auto.is_paused());
    }

    #[test]
    fn loads_custom_tables_from_json() {
        let json = r#"{
            "status": {"AAA=": "CHARGING", "BBB=": "GOING_TO_CHARGE"},
            "errors": {"CCC=": "Wheel stuck"},
            "modes": {}
        }"#;

        let tables = ProtocolTables::from_json(json).unwrap();
        assert_eq!(tables.status("AAA="), Some(StatusCode::Charging));
        assert_eq!(tables.status("BgoAEAUyAA=="), None);
        assert_eq!(tables.error_label("CCC="), Some("Wheel stuck"));
    }

    #[test]
    fn rejects_unknown_status_code_names() {
        let json = r#"{"status": {"AAA=": "FLYING"}, "errors": {}, "modes": {}}"#;
        assert!(ProtocolTables::from_json(json).is_err());
    }
}
