// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Session events.
//!
//! Every decoded state and every availability change is published on an
//! [`EventBus`]. Hosts that only need the latest state can use the session's
//! watch channel instead.
//!
//! # Examples
//!
//! ```
//! use robovac_lib::event::{DeviceEvent, DeviceId, EventBus};
//! use robovac_lib::state::DeviceState;
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! bus.publish(DeviceEvent::state_updated(DeviceId::new("vac-1"), DeviceState::new()));
//! assert!(rx.try_recv().unwrap().is_state_update());
//! ```

mod device_event;
mod device_id;
mod event_bus;

pub use device_event::DeviceEvent;
pub use device_id::DeviceId;
pub use event_bus::EventBus;
