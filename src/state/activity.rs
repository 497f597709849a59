// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host-facing activity derived from the decoded state.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::device_state::{DeviceState, FaultState};
use crate::tables::StatusCode;

/// The small set of activities a home-automation host understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    /// Nothing is happening.
    #[default]
    Idle,
    /// A cleaning run is in progress.
    Cleaning,
    /// A cleaning run is paused.
    Paused,
    /// Heading back to the dock.
    Returning,
    /// Sitting on the dock.
    Docked,
    /// The device reports a fault.
    Error,
}

impl Activity {
    /// Derives the activity from a state.
    ///
    /// Rules, first match wins:
    ///
    /// 1. no status yet → `Idle`
    /// 2. a known fault → `Error`
    /// 3. charging or completed → `Docked`
    /// 4. going to charge → `Returning`
    /// 5. standby or sleeping → `Idle`
    /// 6. any paused run → `Paused`
    /// 7. anything else, including unknown status codes → `Cleaning`
    ///
    /// # Examples
    ///
    /// ```
    /// use robovac_lib::state::{Activity, DeviceState, FaultState, Status};
    /// use robovac_lib::tables::StatusCode;
    ///
    /// let state = DeviceState::new().with_status(Status::Known(StatusCode::RoomPause));
    /// assert_eq!(Activity::derive(&state), Activity::Paused);
    ///
    /// let state = state.with_fault(FaultState::Fault("Robot stuck".into()));
    /// assert_eq!(Activity::derive(&state), Activity::Error);
    /// ```
    #[must_use]
    pub fn derive(state: &DeviceState) -> Self {
        let Some(status) = state.status() else {
            return Self::Idle;
        };

        if state.fault().is_some_and(FaultState::is_fault) {
            return Self::Error;
        }

        match status.code() {
            Some(StatusCode::Charging | StatusCode::Completed) => Self::Docked,
            Some(StatusCode::GoingToCharge) => Self::Returning,
            Some(StatusCode::Standby | StatusCode::Sleeping) => Self::Idle,
            Some(code) if code.is_paused() => Self::Paused,
            Some(_) | None => Self::Cleaning,
        }
    }

    /// Returns the lowercase name used in attributes and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Cleaning => "cleaning",
            Self::Paused => "paused",
            Self::Returning => "returning",
            Self::Docked => "docked",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DeviceState {
    /// Derives the host-facing activity of this state.
    #[must_use]
    pub fn activity(&self) -> Activity {
        Activity::derive(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Status;

    fn with_code(code: StatusCode) -> DeviceState {
        DeviceState::new().with_status(Status::Known(code))
    }

    #[test]
    fn docked_and_returning() {
        assert_eq!(with_code(StatusCode::Charging).activity(), Activity::Docked);
        assert_eq!(with_code(StatusCode::Completed).activity(), Activity::Docked);
        assert_eq!(
            with_code(StatusCode::GoingToCharge).activity(),
            Activity::Returning
        );
    }

    #[test]
    fn every_pause_variant_is_paused() {
        for code in [StatusCode::Pause, StatusCode::RoomPause, StatusCode::SpotPause] {
            assert_eq!(with_code(code).activity(), Activity::Paused);
        }
    }

    #[test]
    fn idle_states() {
        assert_eq!(DeviceState::new().activity(), Activity::Idle);
        assert_eq!(with_code(StatusCode::Standby).activity(), Activity::Idle);
        assert_eq!(with_code(StatusCode::Sleeping).activity(), Activity::Idle);
    }

    #[test]
    fn cleaning_states() {
        for code in [
            StatusCode::Auto,
            StatusCode::Position,
            StatusCode::Room,
            StatusCode::Spot,
            StatusCode::StartManual,
        ] {
            assert_eq!(with_code(code).activity(), Activity::Cleaning);
        }

        let unknown = DeviceState::new().with_status(Status::Unknown("zz".to_string()));
        assert_eq!(unknown.activity(), Activity::Cleaning);
    }

    #[test]
    fn fault_takes_precedence() {
        let state = with_code(StatusCode::Charging)
            .with_fault(FaultState::Fault("Sidebrush stuck".to_string()));
        assert_eq!(state.activity(), Activity::Error);
    }

    #[test]
    fn unknown_fault_is_not_an_error() {
        let state =
            with_code(StatusCode::Charging).with_fault(FaultState::Unknown("x".to_string()));
        assert_eq!(state.activity(), Activity::Docked);

        let state = with_code(StatusCode::Auto).with_fault(FaultState::NoError);
        assert_eq!(state.activity(), Activity::Cleaning);
    }

    #[test]
    fn missing_status_wins_over_fault() {
        let state = DeviceState::new().with_fault(FaultState::Fault("Robot stuck".to_string()));
        assert_eq!(state.activity(), Activity::Idle);
    }

    #[test]
    fn display_names() {
        assert_eq!(Activity::Returning.to_string(), "returning");
        assert_eq!(Activity::default(), Activity::Idle);
    }
}
