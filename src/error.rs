// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `RoboVac` library.
//!
//! Decoding and activity derivation never fail: anomalies resolve to explicit
//! "unknown" values. All fallibility lives in the transport calls, in command
//! encoding, and in session construction.

use thiserror::Error;

use crate::scheduler::FailureClass;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred during protocol communication.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while parsing a payload.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error occurred during device setup or operation.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),

    /// Device does not support the requested capability.
    #[error("device does not support {0}")]
    CapabilityNotSupported(&'static str),

    /// The session is permanently unavailable and rejects commands.
    #[error("device is unavailable: {0}")]
    Unavailable(FailureClass),
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A fan speed label is not offered by this model.
    #[error("unknown fan speed: {0}")]
    UnknownFanSpeed(String),

    /// A command parameter has the wrong shape.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// The parameter name.
        name: &'static str,
        /// Description of the problem.
        message: String,
    },
}

/// Errors reported by the transport collaborator.
///
/// Timeouts and socket failures are classified by the transport; this layer
/// only distinguishes success from failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Connection to the device failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Request timed out.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// The device answered with an error frame.
    #[error("device rejected request: {0}")]
    Rejected(String),

    /// The transport has been disabled.
    #[error("transport is disabled")]
    Disabled,
}

/// Errors related to decoding structured payloads.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Base64 decoding failed.
    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Decoded bytes are not valid text.
    #[error("payload is not valid UTF-8")]
    Utf8,

    /// Expected field is missing from the payload.
    #[error("missing field in payload: {0}")]
    MissingField(String),
}

/// Errors related to device setup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// The transport does not know this model.
    #[error("model {0} is not supported")]
    UnsupportedModel(String),

    /// No network address was configured.
    #[error("no network address configured")]
    MissingAddress,

    /// The command needs a data point the model does not expose.
    #[error("model has no data point for {0}")]
    MissingDataPoint(&'static str),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::UnknownFanSpeed("Turbo".to_string());
        assert_eq!(err.to_string(), "unknown fan speed: Turbo");
    }

    #[test]
    fn error_from_device_error() {
        let err: Error = DeviceError::MissingAddress.into();
        assert!(matches!(err, Error::Device(DeviceError::MissingAddress)));
    }

    #[test]
    fn parse_error_display() {
        let err = ParseError::MissingField("consumable".to_string());
        assert_eq!(err.to_string(), "missing field in payload: consumable");
    }

    #[test]
    fn unavailable_display() {
        let err = Error::Unavailable(FailureClass::UnsupportedModel);
        assert_eq!(err.to_string(), "device is unavailable: unsupported model");
    }

    #[test]
    fn protocol_error_display() {
        let err = ProtocolError::Timeout(5000);
        assert_eq!(err.to_string(), "request timed out after 5000 ms");
    }
}
