// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command intent → data-point writes.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::Serialize;

use super::VacuumCommand;
use crate::capabilities::{Capabilities, FeatureMask, PlatformFeatures};
use crate::error::{DeviceError, Error, ParseError};
use crate::protocol::{CommandCodeTable, DataPoint, DpWrite, WireValue};
use crate::state::DeviceState;
use crate::types::FanSpeedTable;

/// Do-not-disturb window blob written when switching the window off.
pub const DND_WINDOW_DISABLED: &str = "MEQ4MDAwMDAw";

/// Do-not-disturb window blob written when switching the window on.
pub const DND_WINDOW_ENABLED: &str = "MTAwMDAwMDAw";

const MODE_START: &str = "BBoCCAE=";
const MODE_PAUSE: &str = "AggN";
const MODE_RETURN: &str = "AggG";
const MODE_SPOT: &str = "Spot";
const CLEAN_MODE_EDGE: &str = "Edge";
const CLEAN_MODE_SMALL_ROOM: &str = "SmallRoom";

/// Room clean request, serialized in wire key order.
#[derive(Debug, Serialize)]
struct RoomCleanRequest<'a> {
    method: &'static str,
    data: RoomCleanData<'a>,
    timestamp: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RoomCleanData<'a> {
    room_ids: &'a [u32],
    clean_times: u32,
}

/// Encodes command intents for one model.
///
/// Stateless apart from the model's immutable tables: toggles read the
/// current [`DeviceState`] passed to [`encode`](Self::encode).
///
/// # Examples
///
/// ```
/// use robovac_lib::command::{CommandEncoder, VacuumCommand};
/// use robovac_lib::protocol::{CommandCodeTable, DataPoint, WireValue};
/// use robovac_lib::state::DeviceState;
/// use robovac_lib::types::FanSpeedTable;
/// use robovac_lib::{Capabilities, FeatureMask, PlatformFeatures};
///
/// let encoder = CommandEncoder::new(
///     CommandCodeTable::new().with(DataPoint::Mode, "152"),
///     Capabilities::new(PlatformFeatures::PAUSE, FeatureMask::empty()),
///     FanSpeedTable::default(),
/// );
///
/// let writes = encoder.encode(&VacuumCommand::Pause, &DeviceState::new()).unwrap();
/// assert_eq!(writes[0].key, "152");
/// assert_eq!(writes[0].value, WireValue::from("AggN"));
///
/// assert!(encoder.encode(&VacuumCommand::Start, &DeviceState::new()).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct CommandEncoder {
    codes: CommandCodeTable,
    capabilities: Capabilities,
    fan_speeds: FanSpeedTable,
}

impl CommandEncoder {
    /// Creates an encoder for a model.
    #[must_use]
    pub fn new(
        codes: CommandCodeTable,
        capabilities: Capabilities,
        fan_speeds: FanSpeedTable,
    ) -> Self {
        Self {
            codes,
            capabilities,
            fan_speeds,
        }
    }

    /// Returns the model's fan speeds.
    #[must_use]
    pub fn fan_speeds(&self) -> &FanSpeedTable {
        &self.fan_speeds
    }

    /// Encodes a command into the ordered writes to send.
    ///
    /// # Errors
    ///
    /// - `Error::CapabilityNotSupported` if the model lacks the command
    /// - `Error::Value` for an unknown fan speed
    /// - `Error::Device` if the model has no data point for the command
    /// - `Error::Parse` if the room clean request cannot be serialized
    pub fn encode(
        &self,
        command: &VacuumCommand,
        state: &DeviceState,
    ) -> Result<Vec<DpWrite>, Error> {
        match command {
            VacuumCommand::Start => {
                self.require("start", PlatformFeatures::START)?;
                Ok(vec![self.write(DataPoint::Mode, MODE_START)?])
            }
            VacuumCommand::Pause => {
                self.require("pause", PlatformFeatures::PAUSE)?;
                Ok(vec![self.write(DataPoint::Mode, MODE_PAUSE)?])
            }
            VacuumCommand::Stop => {
                self.require("stop", PlatformFeatures::STOP)?;
                Ok(vec![self.write(DataPoint::Mode, MODE_RETURN)?])
            }
            VacuumCommand::ReturnToBase => {
                self.require("return to base", PlatformFeatures::RETURN_HOME)?;
                Ok(vec![self.write(DataPoint::Mode, MODE_RETURN)?])
            }
            VacuumCommand::Locate => {
                self.require("locate", PlatformFeatures::LOCATE)?;
                Ok(vec![self.write(DataPoint::Locate, !state.is_locating())?])
            }
            VacuumCommand::SpotClean => {
                self.require("spot clean", PlatformFeatures::CLEAN_SPOT)?;
                Ok(vec![self.write(DataPoint::Mode, MODE_SPOT)?])
            }
            VacuumCommand::SetFanSpeed(label) => {
                self.require("fan speed", PlatformFeatures::FAN_SPEED)?;
                let wire = self.fan_speeds.wire_label(label)?;
                Ok(vec![self.write(DataPoint::FanSpeed, wire)?])
            }
            VacuumCommand::EdgeClean => {
                self.require_optional("edge clean", FeatureMask::EDGE)?;
                Ok(vec![self.write(DataPoint::CleanMode, CLEAN_MODE_EDGE)?])
            }
            VacuumCommand::SmallRoomClean => {
                self.require_optional("small room clean", FeatureMask::SMALL_ROOM)?;
                Ok(vec![self.write(DataPoint::CleanMode, CLEAN_MODE_SMALL_ROOM)?])
            }
            VacuumCommand::AutoClean => {
                self.require("auto clean", PlatformFeatures::SEND_COMMAND)?;
                Ok(vec![self.write(DataPoint::Mode, MODE_START)?])
            }
            VacuumCommand::AutoReturn => {
                self.require_optional("auto return", FeatureMask::AUTO_RETURN)?;
                let on = state.auto_return().unwrap_or(false);
                Ok(vec![self.write(DataPoint::AutoReturn, !on)?])
            }
            VacuumCommand::BoostIq => {
                self.require_optional("boost IQ", FeatureMask::BOOST_IQ)?;
                let on = state.boost_iq().unwrap_or(false);
                Ok(vec![self.write(DataPoint::BoostIq, !on)?])
            }
            VacuumCommand::DoNotDisturb => {
                self.require_optional("do not disturb", FeatureMask::DO_NOT_DISTURB)?;
                let (window, enable) = if state.do_not_disturb().unwrap_or(false) {
                    (DND_WINDOW_DISABLED, false)
                } else {
                    (DND_WINDOW_ENABLED, true)
                };
                Ok(vec![
                    self.write(DataPoint::DoNotDisturbWindow, window)?,
                    self.write(DataPoint::DoNotDisturb, enable)?,
                ])
            }
            VacuumCommand::RoomClean { room_ids, count } => {
                self.require_optional("room clean", FeatureMask::ROOM)?;
                let timestamp = chrono::Utc::now().timestamp_millis();
                let payload = room_clean_payload(room_ids, *count, timestamp)?;
                Ok(vec![self.write(DataPoint::RoomClean, payload)?])
            }
            VacuumCommand::Raw { name, value } => {
                self.require("send command", PlatformFeatures::SEND_COMMAND)?;
                Ok(vec![DpWrite::new(name.as_str(), value.clone())])
            }
        }
    }

    fn require(&self, name: &'static str, feature: PlatformFeatures) -> Result<(), Error> {
        self.capabilities.require_platform(name, feature)
    }

    /// Optional features arrive through the free-form command surface.
    fn require_optional(&self, name: &'static str, feature: FeatureMask) -> Result<(), Error> {
        self.capabilities
            .require_platform("send command", PlatformFeatures::SEND_COMMAND)?;
        self.capabilities.require_feature(name, feature)
    }

    fn write(&self, point: DataPoint, value: impl Into<WireValue>) -> Result<DpWrite, Error> {
        let key = self
            .codes
            .resolve(point)
            .ok_or(DeviceError::MissingDataPoint(point.name()))?;
        Ok(DpWrite::new(key, value))
    }
}

/// Builds the base64 room clean request.
fn room_clean_payload(room_ids: &[u32], count: u32, timestamp: i64) -> Result<String, ParseError> {
    let request = RoomCleanRequest {
        method: "selectRoomsClean",
        data: RoomCleanData {
            room_ids,
            clean_times: count,
        },
        timestamp,
    };

    let json = serde_json::to_string(&request)?;
    Ok(STANDARD.encode(json))
}
