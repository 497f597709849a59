// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Vacuum command intents.
//!
//! A [`VacuumCommand`] says what the host wants; the [`CommandEncoder`] turns
//! it into the data-point writes the model expects.
//!
//! # Available Commands
//!
//! | Command | Host name | Writes |
//! |---------|-----------|--------|
//! | [`VacuumCommand::Start`] | `start` | mode ← `BBoCCAE=` |
//! | [`VacuumCommand::Pause`] | `pause` | mode ← `AggN` |
//! | [`VacuumCommand::Stop`] | `stop` | mode ← `AggG` |
//! | [`VacuumCommand::ReturnToBase`] | `return_to_base` | mode ← `AggG` |
//! | [`VacuumCommand::Locate`] | `locate` | locate ← inverse of current |
//! | [`VacuumCommand::SpotClean`] | `clean_spot` | mode ← `Spot` |
//! | [`VacuumCommand::SetFanSpeed`] | `set_fan_speed` | fan speed ← wire label |
//! | [`VacuumCommand::EdgeClean`] | `edgeClean` | clean mode ← `Edge` |
//! | [`VacuumCommand::SmallRoomClean`] | `smallRoomClean` | clean mode ← `SmallRoom` |
//! | [`VacuumCommand::AutoClean`] | `autoClean` | mode ← `BBoCCAE=` |
//! | [`VacuumCommand::AutoReturn`] | `autoReturn` | toggle |
//! | [`VacuumCommand::DoNotDisturb`] | `doNotDisturb` | window blob, then toggle |
//! | [`VacuumCommand::BoostIq`] | `boostIQ` | toggle |
//! | [`VacuumCommand::RoomClean`] | `roomClean` | base64 JSON request |
//! | [`VacuumCommand::Raw`] | anything else | name ← `value` |
//!
//! # Examples
//!
//! ```
//! use robovac_lib::command::VacuumCommand;
//! use serde_json::json;
//!
//! let params = json!({"roomIds": [2, 3], "count": 2});
//! let cmd = VacuumCommand::from_name("roomClean", &params).unwrap();
//! assert_eq!(cmd, VacuumCommand::RoomClean { room_ids: vec![2, 3], count: 2 });
//!
//! let cmd = VacuumCommand::from_name("edgeClean", &json!(null)).unwrap();
//! assert_eq!(cmd, VacuumCommand::EdgeClean);
//! ```

mod encoder;

pub use encoder::{CommandEncoder, DND_WINDOW_DISABLED, DND_WINDOW_ENABLED};

use serde_json::Value;

use crate::error::ValueError;
use crate::protocol::WireValue;

/// A command the host can issue to a vacuum.
#[derive(Debug, Clone, PartialEq)]
pub enum VacuumCommand {
    /// Start automatic cleaning.
    Start,
    /// Pause the current run.
    Pause,
    /// Stop the current run.
    Stop,
    /// Return to the dock.
    ReturnToBase,
    /// Toggle the locate beep.
    Locate,
    /// Clean around the current spot.
    SpotClean,
    /// Select a fan speed by display label.
    SetFanSpeed(String),
    /// Clean along the edges.
    EdgeClean,
    /// Clean a small room.
    SmallRoomClean,
    /// Start automatic cleaning through the legacy mode key.
    AutoClean,
    /// Toggle automatic return to base.
    AutoReturn,
    /// Toggle the do-not-disturb window.
    DoNotDisturb,
    /// Toggle boost IQ.
    BoostIq,
    /// Clean selected rooms.
    RoomClean {
        /// Room identifiers from the device map.
        room_ids: Vec<u32>,
        /// Number of passes.
        count: u32,
    },
    /// Write `value` to the data point `name` unchanged.
    Raw {
        /// The wire key.
        name: String,
        /// The value to write.
        value: WireValue,
    },
}

impl VacuumCommand {
    /// Parses a named host command with its parameters.
    ///
    /// `params` may be `null` or an object. Unrecognized names become
    /// [`VacuumCommand::Raw`] with the `value` parameter, or an empty string
    /// if it is missing.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidParameter` if `roomClean` parameters are
    /// malformed.
    pub fn from_name(name: &str, params: &Value) -> Result<Self, ValueError> {
        match name {
            "edgeClean" => Ok(Self::EdgeClean),
            "smallRoomClean" => Ok(Self::SmallRoomClean),
            "autoClean" => Ok(Self::AutoClean),
            "autoReturn" => Ok(Self::AutoReturn),
            "doNotDisturb" => Ok(Self::DoNotDisturb),
            "boostIQ" => Ok(Self::BoostIq),
            "roomClean" => Ok(Self::RoomClean {
                room_ids: parse_room_ids(params.get("roomIds"))?,
                count: parse_count(params.get("count"))?,
            }),
            _ => Ok(Self::Raw {
                name: name.to_string(),
                value: params
                    .get("value")
                    .map_or_else(|| WireValue::from(""), json_to_wire),
            }),
        }
    }

    /// Returns the host-facing name, for logs.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Start => "start",
            Self::Pause => "pause",
            Self::Stop => "stop",
            Self::ReturnToBase => "return_to_base",
            Self::Locate => "locate",
            Self::SpotClean => "clean_spot",
            Self::SetFanSpeed(_) => "set_fan_speed",
            Self::EdgeClean => "edgeClean",
            Self::SmallRoomClean => "smallRoomClean",
            Self::AutoClean => "autoClean",
            Self::AutoReturn => "autoReturn",
            Self::DoNotDisturb => "doNotDisturb",
            Self::BoostIq => "boostIQ",
            Self::RoomClean { .. } => "roomClean",
            Self::Raw { name, .. } => name,
        }
    }
}

fn parse_room_ids(value: Option<&Value>) -> Result<Vec<u32>, ValueError> {
    let Some(value) = value else {
        return Ok(vec![1]);
    };

    let invalid = || ValueError::InvalidParameter {
        name: "roomIds",
        message: format!("expected a list of room numbers, got {value}"),
    };

    value
        .as_array()
        .ok_or_else(invalid)?
        .iter()
        .map(|id| {
            id.as_u64()
                .and_then(|id| u32::try_from(id).ok())
                .ok_or_else(invalid)
        })
        .collect()
}

fn parse_count(value: Option<&Value>) -> Result<u32, ValueError> {
    let Some(value) = value else {
        return Ok(1);
    };

    value
        .as_u64()
        .and_then(|count| u32::try_from(count).ok())
        .ok_or_else(|| ValueError::InvalidParameter {
            name: "count",
            message: format!("expected a pass count, got {value}"),
        })
}

fn json_to_wire(value: &Value) -> WireValue {
    match value {
        Value::Bool(b) => WireValue::Bool(*b),
        Value::Number(n) => n
            .as_i64()
            .map(WireValue::Integer)
            .or_else(|| n.as_f64().map(WireValue::Float))
            .unwrap_or_else(|| WireValue::Text(n.to_string())),
        Value::String(s) => WireValue::Text(s.clone()),
        Value::Null => WireValue::from(""),
        Value::Array(_) | Value::Object(_) => WireValue::Text(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_named_commands() {
        let cases = [
            ("smallRoomClean", VacuumCommand::SmallRoomClean),
            ("autoClean", VacuumCommand::AutoClean),
            ("autoReturn", VacuumCommand::AutoReturn),
            ("doNotDisturb", VacuumCommand::DoNotDisturb),
            ("boostIQ", VacuumCommand::BoostIq),
        ];

        for (name, expected) in cases {
            let cmd = VacuumCommand::from_name(name, &json!(null)).unwrap();
            assert_eq!(cmd, expected);
            assert_eq!(cmd.name(), name);
        }
    }

    #[test]
    fn room_clean_defaults() {
        let cmd = VacuumCommand::from_name("roomClean", &json!({})).unwrap();
        assert_eq!(
            cmd,
            VacuumCommand::RoomClean {
                room_ids: vec![1],
                count: 1
            }
        );
    }

    #[test]
    fn room_clean_rejects_bad_ids() {
        let err =
            VacuumCommand::from_name("roomClean", &json!({"roomIds": "kitchen"})).unwrap_err();
        assert!(matches!(err, ValueError::InvalidParameter { name: "roomIds", .. }));

        let err = VacuumCommand::from_name("roomClean", &json!({"count": -1})).unwrap_err();
        assert!(matches!(err, ValueError::InvalidParameter { name: "count", .. }));
    }

    #[test]
    fn unknown_names_pass_through() {
        let cmd = VacuumCommand::from_name("custom", &json!({"value": 7})).unwrap();
        assert_eq!(
            cmd,
            VacuumCommand::Raw {
                name: "custom".to_string(),
                value: WireValue::Integer(7)
            }
        );

        let cmd = VacuumCommand::from_name("custom", &json!(null)).unwrap();
        assert_eq!(
            cmd,
            VacuumCommand::Raw {
                name: "custom".to_string(),
                value: WireValue::from("")
            }
        );
        assert_eq!(cmd.name(), "custom");
    }

    #[test]
    fn json_values_map_to_wire_values() {
        assert_eq!(json_to_wire(&json!(true)), WireValue::Bool(true));
        assert_eq!(json_to_wire(&json!(1.5)), WireValue::Float(1.5));
        assert_eq!(json_to_wire(&json!("x")), WireValue::from("x"));
        assert_eq!(json_to_wire(&json!([1])), WireValue::from("[1]"));
    }
}
