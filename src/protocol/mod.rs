// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Boundary to the transport collaborator.
//!
//! The transport owns network I/O, encryption, and keep-alive for one device.
//! This crate only needs the narrow [`Transport`] contract: fetch a raw
//! snapshot, write data points, report the model's tables once, and announce
//! unsolicited pushes.
//!
//! # Wire Model
//!
//! - [`RawSnapshot`]: wire key → [`WireValue`]
//! - [`DpWrite`]: one key/value write
//! - [`CommandCodeTable`]: [`DataPoint`] → model wire key

mod codes;
mod wire;

pub use codes::{CommandCodeTable, DataPoint};
pub use wire::{DpWrite, RawSnapshot, WireValue};

use std::future::Future;
use std::sync::Arc;

use crate::error::ProtocolError;

/// Callback the transport invokes, without arguments, when it has new data.
pub type PushHandler = Arc<dyn Fn() + Send + Sync>;

/// Transport collaborator for one device.
///
/// Implementations enforce their own timeouts and keep-alive interval and
/// surface every failure as a [`ProtocolError`].
pub trait Transport: Send + Sync + 'static {
    /// Fetches the current data points.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the request fails or times out.
    fn get(&self) -> impl Future<Output = Result<RawSnapshot, ProtocolError>> + Send;

    /// Writes one or more data points.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the write fails or times out.
    fn set(&self, writes: RawSnapshot) -> impl Future<Output = Result<(), ProtocolError>> + Send;

    /// Releases the connection. Calling it more than once is harmless.
    fn disable(&self) -> impl Future<Output = ()> + Send;

    /// Returns the most recent data points without performing I/O.
    ///
    /// This is what a push announces.
    fn latest(&self) -> RawSnapshot;

    /// Host-facing feature bits of the model.
    fn platform_features(&self) -> u32;

    /// Optional vacuum feature bits of the model.
    fn capability_features(&self) -> u32;

    /// Wire labels of the fan speeds the model offers.
    fn fan_speeds(&self) -> Vec<String>;

    /// Data point keys of the model.
    fn command_codes(&self) -> CommandCodeTable;

    /// Registers the push callback.
    fn set_push_handler(&self, handler: PushHandler);
}
