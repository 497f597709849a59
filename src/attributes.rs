// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extra state attributes for the host platform.
//!
//! Projects a [`DeviceState`] onto the flat attribute map a home-automation
//! host shows next to the vacuum entity. Optional fields appear only when the
//! model supports them and they hold a truthy value. The work mode appears
//! both raw and, when the mode table knows it, as a label.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::capabilities::FeatureMask;
use crate::state::{DeviceState, FaultState};
use crate::tables::ProtocolTables;

/// Attribute key for the fault label.
pub const ATTR_ERROR: &str = "error";
/// Attribute key for the cleaned area.
pub const ATTR_CLEANING_AREA: &str = "cleaning_area";
/// Attribute key for the cleaning time.
pub const ATTR_CLEANING_TIME: &str = "cleaning_time";
/// Attribute key for the auto-return switch.
pub const ATTR_AUTO_RETURN: &str = "auto_return";
/// Attribute key for the do-not-disturb switch.
pub const ATTR_DO_NOT_DISTURB: &str = "do_not_disturb";
/// Attribute key for the boost IQ switch.
pub const ATTR_BOOST_IQ: &str = "boost_iq";
/// Attribute key for consumable wear.
pub const ATTR_CONSUMABLES: &str = "consumables";
/// Attribute key for the raw work mode.
pub const ATTR_MODE: &str = "mode";
/// Attribute key for the work mode label.
pub const ATTR_MODE_LABEL: &str = "mode_label";

/// Builds the attribute map for a state.
///
/// # Examples
///
/// ```
/// use robovac_lib::FeatureMask;
/// use robovac_lib::attributes::{self, ATTR_ERROR};
/// use robovac_lib::state::{DeviceState, FaultState};
/// use robovac_lib::tables::ProtocolTables;
///
/// let state = DeviceState::new().with_fault(FaultState::Fault("Robot stuck".into()));
/// let attrs = attributes::project(&state, FeatureMask::empty(), &ProtocolTables::default());
/// assert_eq!(attrs[ATTR_ERROR], "Robot stuck");
/// ```
#[must_use]
pub fn project(
    state: &DeviceState,
    features: FeatureMask,
    tables: &ProtocolTables,
) -> BTreeMap<&'static str, Value> {
    let mut attrs = BTreeMap::new();

    if let Some(FaultState::Fault(label)) = state.fault() {
        attrs.insert(ATTR_ERROR, Value::from(label.as_str()));
    }

    let gated = |feature: FeatureMask| features.supports(feature);

    if gated(FeatureMask::CLEANING_AREA)
        && let Some(area) = state.cleaning_area().filter(|area| *area != 0)
    {
        attrs.insert(ATTR_CLEANING_AREA, Value::from(area));
    }
    if gated(FeatureMask::CLEANING_TIME)
        && let Some(time) = state.cleaning_time().filter(|time| *time != 0)
    {
        attrs.insert(ATTR_CLEANING_TIME, Value::from(time));
    }
    if gated(FeatureMask::AUTO_RETURN) && state.auto_return() == Some(true) {
        attrs.insert(ATTR_AUTO_RETURN, Value::Bool(true));
    }
    if gated(FeatureMask::DO_NOT_DISTURB) && state.do_not_disturb() == Some(true) {
        attrs.insert(ATTR_DO_NOT_DISTURB, Value::Bool(true));
    }
    if gated(FeatureMask::BOOST_IQ) && state.boost_iq() == Some(true) {
        attrs.insert(ATTR_BOOST_IQ, Value::Bool(true));
    }
    if gated(FeatureMask::CONSUMABLES)
        && let Some(consumables) = state.consumables().filter(|c| !c.durations().is_empty())
    {
        attrs.insert(
            ATTR_CONSUMABLES,
            serde_json::to_value(consumables).unwrap_or(Value::Null),
        );
    }

    if let Some(mode) = state.mode().filter(|mode| !mode.is_empty()) {
        attrs.insert(ATTR_MODE, Value::from(mode));
        if let Some(label) = tables.mode_label(mode) {
            attrs.insert(ATTR_MODE_LABEL, Value::from(label));
        }
    }

    attrs
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use serde_json::json;

    use super::*;
    use crate::protocol::{CommandCodeTable, DataPoint, RawSnapshot, WireValue};
    use crate::state::Decoder;

    fn tables() -> ProtocolTables {
        ProtocolTables::default()
    }

    #[test]
    fn empty_state_has_no_attributes() {
        assert!(project(&DeviceState::new(), FeatureMask::all(), &tables()).is_empty());
    }

    #[test]
    fn no_error_and_unknown_faults_are_hidden() {
        let state = DeviceState::new().with_fault(FaultState::NoError);
        assert!(!project(&state, FeatureMask::empty(), &tables()).contains_key(ATTR_ERROR));

        let state = DeviceState::new().with_fault(FaultState::Unknown("blob".to_string()));
        assert!(!project(&state, FeatureMask::empty(), &tables()).contains_key(ATTR_ERROR));
    }

    #[test]
    fn switches_need_feature_and_truthy_value() {
        let state = DeviceState::new()
            .with_auto_return(true)
            .with_boost_iq(false)
            .with_do_not_disturb(true);

        let attrs = project(
            &state,
            FeatureMask::AUTO_RETURN | FeatureMask::BOOST_IQ,
            &tables(),
        );
        assert_eq!(attrs.get(ATTR_AUTO_RETURN), Some(&json!(true)));
        assert!(!attrs.contains_key(ATTR_BOOST_IQ));
        assert!(!attrs.contains_key(ATTR_DO_NOT_DISTURB));
    }

    #[test]
    fn decoded_counters_and_mode() {
        let features =
            FeatureMask::CLEANING_AREA | FeatureMask::CLEANING_TIME | FeatureMask::CONSUMABLES;
        let codes = CommandCodeTable::new()
            .with(DataPoint::Mode, "152")
            .with(DataPoint::CleaningArea, "6")
            .with(DataPoint::CleaningTime, "7")
            .with(DataPoint::Consumables, "168");
        let decoder = Decoder::new(codes, features, Arc::new(tables()));

        let blob = STANDARD.encode(r#"{"consumable":{"duration":{"SB":12}}}"#);
        let raw: RawSnapshot = [
            ("152", WireValue::from("AggN")),
            ("6", WireValue::Integer(14)),
            ("7", WireValue::Integer(0)),
            ("168", WireValue::from(blob)),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let attrs = project(&decoder.decode(&raw, &DeviceState::new()), features, &tables());
        assert_eq!(attrs[ATTR_MODE], json!("AggN"));
        assert_eq!(attrs[ATTR_MODE_LABEL], json!("Pause"));
        assert_eq!(attrs[ATTR_CLEANING_AREA], json!(14));
        assert!(!attrs.contains_key(ATTR_CLEANING_TIME));
        assert_eq!(attrs[ATTR_CONSUMABLES], json!({"SB": 12}));
    }

    #[test]
    fn unknown_mode_has_no_label() {
        let codes = CommandCodeTable::new().with(DataPoint::Mode, "152");
        let decoder = Decoder::new(codes, FeatureMask::empty(), Arc::new(tables()));
        let raw = RawSnapshot::from([("152".to_string(), WireValue::from("Zm9v"))]);

        let attrs = project(
            &decoder.decode(&raw, &DeviceState::new()),
            FeatureMask::empty(),
            &tables(),
        );
        assert_eq!(attrs[ATTR_MODE], json!("Zm9v"));
        assert!(!attrs.contains_key(ATTR_MODE_LABEL));
    }
}
