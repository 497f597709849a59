// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decoded device state and the host-facing activity.
//!
//! The [`Decoder`] turns a raw snapshot into a [`DeviceState`], and
//! [`Activity::derive`] reduces that state to what a home-automation host
//! displays.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use robovac_lib::FeatureMask;
//! use robovac_lib::protocol::{CommandCodeTable, DataPoint, RawSnapshot, WireValue};
//! use robovac_lib::state::{Activity, Decoder, DeviceState};
//! use robovac_lib::tables::ProtocolTables;
//!
//! let codes = CommandCodeTable::new().with(DataPoint::Status, "153");
//! let decoder = Decoder::new(codes, FeatureMask::empty(), Arc::new(ProtocolTables::default()));
//!
//! let raw = RawSnapshot::from([("153".to_string(), WireValue::from("BBAHQgA="))]);
//! let state = decoder.decode(&raw, &DeviceState::new());
//!
//! assert_eq!(state.status().unwrap().label(), "Recharge");
//! assert_eq!(state.activity(), Activity::Returning);
//! ```

mod activity;
mod decoder;
mod device_state;

pub use activity::Activity;
pub use decoder::Decoder;
pub use device_state::{Consumables, DeviceState, FaultState, Status};
