// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `RoboVac` Lib - state sync and command translation for Eufy `RoboVac`
//! vacuums.
//!
//! The vacuum speaks an opaque data-point protocol: small numeric keys with
//! integers, booleans, short codes and base64 blobs as values. This library
//! sits between that wire vocabulary and a host platform that wants a stable,
//! typed device state.
//!
//! # Supported Features
//!
//! - **State decoding**: status, faults, battery, fan speed, counters and
//!   consumables into an immutable [`DeviceState`]
//! - **Capability gating**: per-model feature masks decide which fields and
//!   commands exist
//! - **Command encoding**: start, pause, return, locate, spot, fan speed and
//!   room cleaning as exact wire writes
//! - **Refresh scheduling**: warm-up retries, periodic polling, push updates
//!   and connection health
//!
//! The network transport is an external collaborator behind the
//! [`Transport`] trait.
//!
//! # Quick Start
//!
//! ```no_run
//! use robovac_lib::{SessionConfig, Transport, VacuumSession};
//!
//! async fn run<T: Transport>(transport: T) -> robovac_lib::Result<()> {
//!     let config = SessionConfig::new("bf7a2c0e51d4c9e2a1xq", "T2267", "f1e2d3c4b5a69788")
//!         .with_host("192.168.1.40");
//!
//!     let session = VacuumSession::connect(config, |_| Ok(transport))?;
//!
//!     session.set_fan_speed("Max").await?;
//!     session
//!         .send_command("roomClean", &serde_json::json!({"roomIds": [2, 3]}))
//!         .await?;
//!
//!     println!("{} ({:?}%)", session.activity(), session.battery_level());
//!     session.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! # Decoding Without a Session
//!
//! ```
//! use std::sync::Arc;
//! use robovac_lib::protocol::{CommandCodeTable, DataPoint, RawSnapshot, WireValue};
//! use robovac_lib::state::{Activity, Decoder, DeviceState};
//! use robovac_lib::tables::ProtocolTables;
//! use robovac_lib::FeatureMask;
//!
//! let codes = CommandCodeTable::new()
//!     .with(DataPoint::Status, "15")
//!     .with(DataPoint::Battery, "104");
//! let decoder = Decoder::new(codes, FeatureMask::empty(), Arc::new(ProtocolTables::default()));
//!
//! let raw = RawSnapshot::from([
//!     ("15".to_string(), WireValue::from("BBADGgA=")),
//!     ("104".to_string(), WireValue::Integer(64)),
//! ]);
//! let state = decoder.decode(&raw, &DeviceState::new());
//!
//! assert_eq!(state.activity(), Activity::Docked);
//! assert_eq!(state.battery_level(), Some(64));
//! ```

pub mod attributes;
mod capabilities;
pub mod command;
pub mod error;
pub mod event;
pub mod protocol;
pub mod scheduler;
pub mod session;
pub mod state;
pub mod tables;
pub mod types;

pub use capabilities::{Capabilities, FeatureMask, PlatformFeatures};
pub use command::{CommandEncoder, VacuumCommand};
pub use error::{DeviceError, Error, ParseError, ProtocolError, Result, ValueError};
pub use event::{DeviceEvent, DeviceId, EventBus};
pub use protocol::{CommandCodeTable, DataPoint, DpWrite, RawSnapshot, Transport, WireValue};
pub use scheduler::{ConnectionHealth, FailureClass, HealthState, RefreshPolicy};
pub use session::{SessionConfig, VacuumSession};
pub use state::{Activity, Consumables, DeviceState, FaultState, Status};
pub use tables::{ProtocolTables, StatusCode};
