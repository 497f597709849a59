// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared by the decoder and the command encoder.
//!
//! - [`FanSpeedTable`] - Model fan speeds, display label ↔ wire label
//! - [`display_label`] - Wire label → display label

mod fan_speed;

pub use fan_speed::{FanSpeedTable, display_label};
