// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device event types.

use crate::scheduler::FailureClass;
use crate::state::{Activity, DeviceState};

use super::DeviceId;

/// Events emitted by a vacuum session.
///
/// # Examples
///
/// ```
/// use robovac_lib::event::{DeviceEvent, DeviceId};
/// use robovac_lib::scheduler::FailureClass;
///
/// let event = DeviceEvent::unavailable(DeviceId::new("vac-1"), FailureClass::ConnectionFailed);
/// assert!(event.is_availability());
/// assert_eq!(event.device_id().as_str(), "vac-1");
/// ```
#[derive(Debug, Clone)]
pub enum DeviceEvent {
    /// A new state was decoded, from a poll or a push.
    StateUpdated {
        /// The ID of the device.
        device_id: DeviceId,
        /// The complete new state.
        state: DeviceState,
        /// The activity derived from `state`.
        activity: Activity,
    },

    /// The session became available or unavailable.
    AvailabilityChanged {
        /// The ID of the device.
        device_id: DeviceId,
        /// Whether the device is now available.
        available: bool,
        /// Why the device is unavailable.
        failure: Option<FailureClass>,
    },
}

impl DeviceEvent {
    /// Returns the device ID associated with this event.
    #[must_use]
    pub fn device_id(&self) -> &DeviceId {
        match self {
            Self::StateUpdated { device_id, .. } | Self::AvailabilityChanged { device_id, .. } => {
                device_id
            }
        }
    }

    /// Returns `true` if this is a state update.
    #[must_use]
    pub fn is_state_update(&self) -> bool {
        matches!(self, Self::StateUpdated { .. })
    }

    /// Returns `true` if this is an availability change.
    #[must_use]
    pub fn is_availability(&self) -> bool {
        matches!(self, Self::AvailabilityChanged { .. })
    }

    /// Creates a state updated event; the activity is derived from `state`.
    #[must_use]
    pub fn state_updated(device_id: DeviceId, state: DeviceState) -> Self {
        let activity = state.activity();
        Self::StateUpdated {
            device_id,
            state,
            activity,
        }
    }

    /// Creates an available event.
    #[must_use]
    pub fn available(device_id: DeviceId) -> Self {
        Self::AvailabilityChanged {
            device_id,
            available: true,
            failure: None,
        }
    }

    /// Creates an unavailable event.
    #[must_use]
    pub fn unavailable(device_id: DeviceId, failure: FailureClass) -> Self {
        Self::AvailabilityChanged {
            device_id,
            available: false,
            failure: Some(failure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Status;
    use crate::tables::StatusCode;

    #[test]
    fn state_updated_derives_activity() {
        let state = DeviceState::new().with_status(Status::Known(StatusCode::Charging));
        let event = DeviceEvent::state_updated(DeviceId::new("vac"), state);

        assert!(event.is_state_update());
        match event {
            DeviceEvent::StateUpdated { activity, .. } => assert_eq!(activity, Activity::Docked),
            DeviceEvent::AvailabilityChanged { .. } => panic!("Expected state update"),
        }
    }

    #[test]
    fn availability_events() {
        let id = DeviceId::new("vac");

        let up = DeviceEvent::available(id.clone());
        assert!(up.is_availability());
        assert_eq!(up.device_id(), &id);

        let down = DeviceEvent::unavailable(id, FailureClass::MissingAddress);
        assert!(matches!(
            down,
            DeviceEvent::AvailabilityChanged {
                available: false,
                failure: Some(FailureClass::MissingAddress),
                ..
            }
        ));
    }
}
