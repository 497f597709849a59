// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Raw snapshot → [`DeviceState`] decoding.

use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::STANDARD};

use super::device_state::{Consumables, DeviceState, FaultState, Status};
use crate::capabilities::FeatureMask;
use crate::error::ParseError;
use crate::protocol::{CommandCodeTable, DataPoint, RawSnapshot, WireValue};
use crate::tables::{NO_ERROR_LABEL, ProtocolTables};
use crate::types::display_label;

/// Decodes raw snapshots for one model.
///
/// The decoder never fails. Values it cannot interpret become `None` or an
/// explicit unknown variant, and the consumables blob keeps its previous
/// value when it does not parse.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use robovac_lib::FeatureMask;
/// use robovac_lib::protocol::{CommandCodeTable, DataPoint, RawSnapshot, WireValue};
/// use robovac_lib::state::{Decoder, DeviceState};
/// use robovac_lib::tables::ProtocolTables;
///
/// let codes = CommandCodeTable::new().with(DataPoint::Battery, "163");
/// let decoder = Decoder::new(codes, FeatureMask::empty(), Arc::new(ProtocolTables::default()));
///
/// let raw = RawSnapshot::from([("163".to_string(), WireValue::Integer(85))]);
/// let state = decoder.decode(&raw, &DeviceState::new());
/// assert_eq!(state.battery_level(), Some(85));
/// ```
#[derive(Debug, Clone)]
pub struct Decoder {
    codes: CommandCodeTable,
    features: FeatureMask,
    tables: Arc<ProtocolTables>,
}

impl Decoder {
    /// Creates a decoder for a model's code table and feature mask.
    #[must_use]
    pub fn new(
        codes: CommandCodeTable,
        features: FeatureMask,
        tables: Arc<ProtocolTables>,
    ) -> Self {
        Self {
            codes,
            features,
            tables,
        }
    }

    /// Returns the protocol tables in use.
    #[must_use]
    pub fn tables(&self) -> &ProtocolTables {
        &self.tables
    }

    /// Builds the next state from a raw snapshot.
    ///
    /// Always-decoded fields are recomputed from `raw`. Feature-gated fields
    /// are recomputed only when the model has the feature; otherwise they are
    /// carried over from `previous`.
    #[must_use]
    pub fn decode(&self, raw: &RawSnapshot, previous: &DeviceState) -> DeviceState {
        let mut state = previous.clone();

        state.status = self.value(raw, DataPoint::Status).map(|v| self.decode_status(v));
        state.fault = self.value(raw, DataPoint::Error).map(|v| self.decode_fault(v));
        state.mode = self.value(raw, DataPoint::Mode).map(ToString::to_string);
        state.fan_speed = self
            .value(raw, DataPoint::FanSpeed)
            .map(|v| display_label(&v.to_string()));
        state.battery = self.value(raw, DataPoint::Battery).and_then(decode_battery);
        state.locating = self.value(raw, DataPoint::Locate).map(WireValue::is_truthy);

        if let Some(value) = self.gated(raw, DataPoint::CleaningArea) {
            state.cleaning_area = value.and_then(WireValue::as_integer);
        }
        if let Some(value) = self.gated(raw, DataPoint::CleaningTime) {
            state.cleaning_time = value.and_then(WireValue::as_integer);
        }
        if let Some(value) = self.gated(raw, DataPoint::AutoReturn) {
            state.auto_return = value.map(WireValue::is_truthy);
        }
        if let Some(value) = self.gated(raw, DataPoint::DoNotDisturb) {
            state.do_not_disturb = value.map(WireValue::is_truthy);
        }
        if let Some(value) = self.gated(raw, DataPoint::BoostIq) {
            state.boost_iq = value.map(WireValue::is_truthy);
        }
        if let Some(Some(value)) = self.gated(raw, DataPoint::Consumables) {
            match decode_consumables(&value.to_string()) {
                Ok(consumables) => state.consumables = Some(consumables),
                Err(e) => {
                    tracing::debug!(error = %e, "Keeping previous consumables");
                }
            }
        }

        state
    }

    /// Model key first, then the legacy key the encoder also writes to.
    fn value<'a>(&self, raw: &'a RawSnapshot, point: DataPoint) -> Option<&'a WireValue> {
        self.codes.resolve(point).and_then(|key| raw.get(key))
    }

    /// Outer `None` when the feature is off, inner `None` when it is on but
    /// the snapshot lacks the value.
    fn gated<'a>(
        &self,
        raw: &'a RawSnapshot,
        point: DataPoint,
    ) -> Option<Option<&'a WireValue>> {
        match point.required_feature() {
            Some(feature) if !self.features.supports(feature) => None,
            _ => Some(self.value(raw, point)),
        }
    }

    fn decode_status(&self, value: &WireValue) -> Status {
        let raw = value.to_string();
        match self.tables.status(&raw) {
            Some(code) => Status::Known(code),
            None => {
                tracing::debug!(status = %raw, "Unknown status code");
                Status::Unknown(raw)
            }
        }
    }

    fn decode_fault(&self, value: &WireValue) -> FaultState {
        if value.is_zero() {
            return FaultState::NoError;
        }

        let raw = value.to_string();
        match self.tables.error_label(&raw) {
            Some(NO_ERROR_LABEL) => FaultState::NoError,
            Some(label) => FaultState::Fault(label.to_string()),
            None if raw == NO_ERROR_LABEL => FaultState::NoError,
            None => {
                tracing::debug!(error_code = %raw, "Unknown error code");
                FaultState::Unknown(raw)
            }
        }
    }
}

fn decode_battery(value: &WireValue) -> Option<u8> {
    value
        .as_integer()
        .and_then(|level| u8::try_from(level).ok())
        .filter(|level| *level <= 100)
}

/// Decodes the consumables blob: base64 of a JSON-like document with a
/// `consumable.duration` object.
///
/// Some firmware emits the document with single quotes and `True`/`False`/
/// `None` literals; those are normalized before a second parse attempt.
pub(crate) fn decode_consumables(blob: &str) -> Result<Consumables, ParseError> {
    let bytes = STANDARD.decode(blob.trim())?;
    let text = String::from_utf8(bytes).map_err(|_| ParseError::Utf8)?;

    let document: serde_json::Value = match serde_json::from_str(&text) {
        Ok(document) => document,
        Err(_) => serde_json::from_str(&normalize_literal(&text))?,
    };

    let durations = document
        .get("consumable")
        .ok_or_else(|| ParseError::MissingField("consumable".to_string()))?
        .get("duration")
        .and_then(serde_json::Value::as_object)
        .ok_or_else(|| ParseError::MissingField("consumable.duration".to_string()))?;

    Ok(Consumables::new(
        durations
            .iter()
            .filter_map(|(name, hours)| hours.as_i64().map(|h| (name.as_str(), h))),
    ))
}

/// Rewrites the firmware's single-quoted literal form as JSON.
///
/// Single-quoted strings become double-quoted, and the bare `True`, `False`
/// and `None` tokens outside strings become their JSON forms.
fn normalize_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' | '\'' => {
                out.push('"');
                copy_string(&mut chars, c, &mut out);
                out.push('"');
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut word = String::from(c);
                while let Some(&next) = chars.peek() {
                    if !(next.is_ascii_alphanumeric() || next == '_') {
                        break;
                    }
                    word.push(next);
                    chars.next();
                }
                out.push_str(match word.as_str() {
                    "True" => "true",
                    "False" => "false",
                    "None" => "null",
                    _ => &word,
                });
            }
            c => out.push(c),
        }
    }
    out
}

/// Copies a string body up to its closing `quote` as JSON string content.
fn copy_string(chars: &mut impl Iterator<Item = char>, quote: char, out: &mut String) {
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('\'') => out.push('\''),
                Some(escaped) => {
                    out.push('\\');
                    out.push(escaped);
                }
                None => return,
            },
            c if c == quote => return,
            '"' => out.push_str("\\\""),
            c => out.push(c),
        }
    }
}
