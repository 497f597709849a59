// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decoded device state.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::tables::StatusCode;

/// Work status of the vacuum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Status {
    /// A status listed in the protocol tables.
    Known(StatusCode),
    /// A status blob the tables do not list.
    Unknown(String),
}

impl Status {
    /// Label shown for status blobs the tables do not list.
    pub const UNKNOWN_LABEL: &'static str = "unknown";

    /// Returns the canonical label.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Known(code) => code.label(),
            Self::Unknown(_) => Self::UNKNOWN_LABEL,
        }
    }

    /// Returns the status code, if known.
    #[must_use]
    pub fn code(&self) -> Option<StatusCode> {
        match self {
            Self::Known(code) => Some(*code),
            Self::Unknown(_) => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Device-reported fault, normalized to one representation.
///
/// The wire carries "no error" either as numeric zero or as one of several
/// blobs the error table labels `no_error`; both become [`FaultState::NoError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FaultState {
    /// The device reports no fault.
    NoError,
    /// A fault listed in the protocol tables, with its label.
    Fault(String),
    /// An error blob the tables do not list.
    Unknown(String),
}

impl FaultState {
    /// Returns `true` for a known fault.
    ///
    /// Unlisted blobs are not treated as faults: every firmware build emits
    /// fresh "no error" blobs with embedded timestamps.
    #[must_use]
    pub fn is_fault(&self) -> bool {
        matches!(self, Self::Fault(_))
    }

    /// Returns the fault label, if any.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Fault(label) => Some(label),
            Self::NoError | Self::Unknown(_) => None,
        }
    }
}

/// Consumable wear counters, in hours used per consumable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Consumables {
    durations: BTreeMap<String, i64>,
}

impl Consumables {
    /// Creates consumables from name → hours pairs.
    pub fn new<I, S>(durations: I) -> Self
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        Self {
            durations: durations.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Returns the hours used for one consumable.
    #[must_use]
    pub fn hours(&self, name: &str) -> Option<i64> {
        self.durations.get(name).copied()
    }

    /// Returns all counters ordered by name.
    #[must_use]
    pub fn durations(&self) -> &BTreeMap<String, i64> {
        &self.durations
    }
}

/// Snapshot of a vacuum's decoded state.
///
/// A new value is built on every decode and swapped in whole; nothing mutates
/// a published state. Every field is optional because it is unknown until the
/// device reports it, and the optional feature fields stay unset for models
/// whose feature mask lacks the matching bit.
///
/// # Examples
///
/// ```
/// use robovac_lib::state::{Activity, DeviceState};
///
/// let state = DeviceState::new();
/// assert_eq!(state.battery_level(), None);
/// assert_eq!(state.activity(), Activity::Idle);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeviceState {
    pub(super) status: Option<Status>,
    pub(super) fault: Option<FaultState>,
    pub(super) mode: Option<String>,
    pub(super) fan_speed: Option<String>,
    pub(super) battery: Option<u8>,
    pub(super) locating: Option<bool>,
    pub(super) cleaning_area: Option<i64>,
    pub(super) cleaning_time: Option<i64>,
    pub(super) auto_return: Option<bool>,
    pub(super) do_not_disturb: Option<bool>,
    pub(super) boost_iq: Option<bool>,
    pub(super) consumables: Option<Consumables>,
}

impl DeviceState {
    /// Creates an empty state, as before the first snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Work status; `None` until a snapshot carried one.
    #[must_use]
    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    /// Device-reported fault; `None` if the snapshot had no error data point.
    #[must_use]
    pub fn fault(&self) -> Option<&FaultState> {
        self.fault.as_ref()
    }

    /// Raw work mode blob.
    #[must_use]
    pub fn mode(&self) -> Option<&str> {
        self.mode.as_deref()
    }

    /// Fan speed display label.
    #[must_use]
    pub fn fan_speed(&self) -> Option<&str> {
        self.fan_speed.as_deref()
    }

    /// Battery percentage (0-100).
    #[must_use]
    pub fn battery_level(&self) -> Option<u8> {
        self.battery
    }

    /// Whether the locate beep is active.
    #[must_use]
    pub fn is_locating(&self) -> bool {
        self.locating.unwrap_or(false)
    }

    /// Area cleaned in the current run.
    #[must_use]
    pub fn cleaning_area(&self) -> Option<i64> {
        self.cleaning_area
    }

    /// Time spent in the current run.
    #[must_use]
    pub fn cleaning_time(&self) -> Option<i64> {
        self.cleaning_time
    }

    /// Auto-return switch.
    #[must_use]
    pub fn auto_return(&self) -> Option<bool> {
        self.auto_return
    }

    /// Do-not-disturb switch.
    #[must_use]
    pub fn do_not_disturb(&self) -> Option<bool> {
        self.do_not_disturb
    }

    /// Boost IQ switch.
    #[must_use]
    pub fn boost_iq(&self) -> Option<bool> {
        self.boost_iq
    }

    /// Consumable wear counters.
    #[must_use]
    pub fn consumables(&self) -> Option<&Consumables> {
        self.consumables.as_ref()
    }

    // ========== Builders ==========

    /// Returns a copy with the given status.
    #[must_use]
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns a copy with the given fault.
    #[must_use]
    pub fn with_fault(mut self, fault: FaultState) -> Self {
        self.fault = Some(fault);
        self
    }

    /// Returns a copy with the given battery level.
    #[must_use]
    pub fn with_battery(mut self, level: u8) -> Self {
        self.battery = Some(level.min(100));
        self
    }

    /// Returns a copy with the locate flag set.
    #[must_use]
    pub fn with_locating(mut self, locating: bool) -> Self {
        self.locating = Some(locating);
        self
    }

    /// Returns a copy with the auto-return switch set.
    #[must_use]
    pub fn with_auto_return(mut self, on: bool) -> Self {
        self.auto_return = Some(on);
        self
    }

    /// Returns a copy with the do-not-disturb switch set.
    #[must_use]
    pub fn with_do_not_disturb(mut self, on: bool) -> Self {
        self.do_not_disturb = Some(on);
        self
    }

    /// Returns a copy with the boost IQ switch set.
    #[must_use]
    pub fn with_boost_iq(mut self, on: bool) -> Self {
        self.boost_iq = Some(on);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_empty() {
        let state = DeviceState::new();
        assert!(state.status().is_none());
        assert!(state.fault().is_none());
        assert!(!state.is_locating());
        assert!(state.consumables().is_none());
    }

    #[test]
    fn status_labels() {
        assert_eq!(Status::Known(StatusCode::Charging).label(), "Charging");
        assert_eq!(Status::Unknown("zzz".to_string()).label(), "unknown");
        assert_eq!(Status::Unknown("zzz".to_string()).code(), None);
    }

    #[test]
    fn only_known_faults_count() {
        assert!(FaultState::Fault("Robot stuck".to_string()).is_fault());
        assert!(!FaultState::NoError.is_fault());
        assert!(!FaultState::Unknown("blob".to_string()).is_fault());
        assert_eq!(FaultState::NoError.label(), None);
    }

    #[test]
    fn battery_builder_clamps() {
        let state = DeviceState::new().with_battery(140);
        assert_eq!(state.battery_level(), Some(100));
    }

    #[test]
    fn consumables_lookup() {
        let consumables = Consumables::new([("SB", 12), ("FM", 40)]);
        assert_eq!(consumables.hours("FM"), Some(40));
        assert_eq!(consumables.hours("RB"), None);
        assert_eq!(consumables.durations().len(), 2);
    }
}
