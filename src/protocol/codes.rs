// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Abstract data points and their per-model wire keys.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::capabilities::FeatureMask;

/// Abstract identifier of a data point, independent of the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataPoint {
    /// Battery percentage.
    Battery,
    /// Work status blob.
    Status,
    /// Error blob.
    Error,
    /// Work mode; also the key start/pause/return commands write to.
    Mode,
    /// Suction level.
    FanSpeed,
    /// Area cleaned in the current run.
    CleaningArea,
    /// Time spent in the current run.
    CleaningTime,
    /// Auto-return switch.
    AutoReturn,
    /// Do-not-disturb switch.
    DoNotDisturb,
    /// Boost IQ switch.
    BoostIq,
    /// Consumable wear blob.
    Consumables,
    /// Locate beep switch.
    Locate,
    /// Legacy cleaning-mode key (edge, small room).
    CleanMode,
    /// Room-selective cleaning request.
    RoomClean,
    /// Do-not-disturb time window blob.
    DoNotDisturbWindow,
}

impl DataPoint {
    /// Returns the feature bit that must be set for this data point to be
    /// decoded, or `None` for always-decoded data points.
    #[must_use]
    pub const fn required_feature(self) -> Option<FeatureMask> {
        match self {
            Self::CleaningArea => Some(FeatureMask::CLEANING_AREA),
            Self::CleaningTime => Some(FeatureMask::CLEANING_TIME),
            Self::AutoReturn => Some(FeatureMask::AUTO_RETURN),
            Self::DoNotDisturb | Self::DoNotDisturbWindow => Some(FeatureMask::DO_NOT_DISTURB),
            Self::BoostIq => Some(FeatureMask::BOOST_IQ),
            Self::Consumables => Some(FeatureMask::CONSUMABLES),
            Self::RoomClean => Some(FeatureMask::ROOM),
            Self::Battery
            | Self::Status
            | Self::Error
            | Self::Mode
            | Self::FanSpeed
            | Self::Locate
            | Self::CleanMode => None,
        }
    }

    /// Returns the wire key older firmware hard-wires for this data point.
    ///
    /// Used when a model's code table does not list the data point.
    #[must_use]
    pub const fn legacy_key(self) -> Option<&'static str> {
        match self {
            Self::CleanMode => Some("5"),
            Self::DoNotDisturb => Some("107"),
            Self::BoostIq => Some("118"),
            Self::RoomClean => Some("124"),
            Self::AutoReturn => Some("135"),
            Self::DoNotDisturbWindow => Some("139"),
            Self::Mode => Some("152"),
            _ => None,
        }
    }

    /// Returns a human-readable name for logs and errors.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Battery => "battery",
            Self::Status => "status",
            Self::Error => "error",
            Self::Mode => "mode",
            Self::FanSpeed => "fan speed",
            Self::CleaningArea => "cleaning area",
            Self::CleaningTime => "cleaning time",
            Self::AutoReturn => "auto return",
            Self::DoNotDisturb => "do not disturb",
            Self::BoostIq => "boost IQ",
            Self::Consumables => "consumables",
            Self::Locate => "locate",
            Self::CleanMode => "clean mode",
            Self::RoomClean => "room clean",
            Self::DoNotDisturbWindow => "do not disturb window",
        }
    }
}

impl fmt::Display for DataPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Mapping from [`DataPoint`] to the model's wire key.
///
/// Resolved once from the transport when a session is constructed.
///
/// # Examples
///
/// ```
/// use robovac_lib::protocol::{CommandCodeTable, DataPoint};
///
/// let codes = CommandCodeTable::new()
///     .with(DataPoint::Battery, "163")
///     .with(DataPoint::Status, "153");
///
/// assert_eq!(codes.get(DataPoint::Battery), Some("163"));
/// assert_eq!(codes.get(DataPoint::Locate), None);
/// // Legacy keys fill gaps for commands older firmware hard-wires.
/// assert_eq!(codes.resolve(DataPoint::RoomClean), Some("124"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandCodeTable {
    keys: HashMap<DataPoint, String>,
}

impl CommandCodeTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the wire key for a data point.
    #[must_use]
    pub fn with(mut self, point: DataPoint, key: impl Into<String>) -> Self {
        self.keys.insert(point, key.into());
        self
    }

    /// Returns the model's wire key for a data point.
    #[must_use]
    pub fn get(&self, point: DataPoint) -> Option<&str> {
        self.keys.get(&point).map(String::as_str)
    }

    /// Returns the model's wire key, falling back to the legacy key.
    #[must_use]
    pub fn resolve(&self, point: DataPoint) -> Option<&str> {
        self.get(point).or_else(|| point.legacy_key())
    }

    /// Returns the number of mapped data points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if no data point is mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl FromIterator<(DataPoint, String)> for CommandCodeTable {
    fn from_iter<I: IntoIterator<Item = (DataPoint, String)>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_key_wins_over_legacy_key() {
        let codes = CommandCodeTable::new().with(DataPoint::AutoReturn, "40");
        assert_eq!(codes.resolve(DataPoint::AutoReturn), Some("40"));
    }

    #[test]
    fn missing_key_without_legacy_fallback() {
        let codes = CommandCodeTable::new();
        assert_eq!(codes.resolve(DataPoint::Battery), None);
        assert_eq!(codes.resolve(DataPoint::CleanMode), Some("5"));
    }

    #[test]
    fn deserializes_from_json() {
        let json = r#"{"BATTERY":"163","FAN_SPEED":"158","BOOST_IQ":"159"}"#;
        let codes: CommandCodeTable = serde_json::from_str(json).unwrap();

        assert_eq!(codes.len(), 3);
        assert_eq!(codes.get(DataPoint::FanSpeed), Some("158"));
        assert_eq!(codes.get(DataPoint::BoostIq), Some("159"));
    }

    #[test]
    fn gated_data_points() {
        assert_eq!(
            DataPoint::Consumables.required_feature(),
            Some(FeatureMask::CONSUMABLES)
        );
        assert_eq!(DataPoint::Battery.required_feature(), None);
    }
}
