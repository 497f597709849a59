// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan speed labels.
//!
//! Models report fan speeds as wire labels such as `"boost_iq"` or `"max"`.
//! The host shows them as display labels (`"Boost Iq"`, `"Max"`), and the
//! encoder needs the reverse mapping when a display label is selected.

use crate::error::ValueError;

/// Converts a wire label to its display form.
///
/// Underscores become spaces and each word gets an upper-case first letter;
/// the rest of each word is kept as is.
///
/// # Examples
///
/// ```
/// use robovac_lib::types::display_label;
///
/// assert_eq!(display_label("boost_iq"), "Boost Iq");
/// assert_eq!(display_label("Pure"), "Pure");
/// assert_eq!(display_label("no_suction"), "No Suction");
/// assert_eq!(display_label(""), "");
/// ```
#[must_use]
pub fn display_label(wire: &str) -> String {
    wire.replace('_', " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Ordered fan speeds of one model: display label ↔ wire label.
///
/// # Examples
///
/// ```
/// use robovac_lib::types::FanSpeedTable;
///
/// let speeds = FanSpeedTable::from_wire(["standard", "boost_iq", "max"]);
/// assert_eq!(speeds.labels(), vec!["Standard", "Boost Iq", "Max"]);
/// assert_eq!(speeds.wire_label("Boost Iq").unwrap(), "boost_iq");
/// assert!(speeds.wire_label("Turbo").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FanSpeedTable {
    entries: Vec<(String, String)>,
}

impl FanSpeedTable {
    /// Builds the table from the model's wire labels, keeping their order.
    pub fn from_wire<I, S>(wire_labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = wire_labels
            .into_iter()
            .map(|wire| {
                let wire = wire.into();
                (display_label(&wire), wire)
            })
            .collect();
        Self { entries }
    }

    /// Returns the display labels in model order.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|(label, _)| label.as_str()).collect()
    }

    /// Returns the wire label for a display label.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::UnknownFanSpeed` if the model has no such speed.
    pub fn wire_label(&self, display: &str) -> Result<&str, ValueError> {
        self.entries
            .iter()
            .find(|(label, _)| label == display)
            .map(|(_, wire)| wire.as_str())
            .ok_or_else(|| ValueError::UnknownFanSpeed(display.to_string()))
    }

    /// Returns `true` if the model offers no fan speeds.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_label_collapses_whitespace() {
        assert_eq!(display_label("  turbo__max "), "Turbo Max");
    }

    #[test]
    fn display_label_keeps_inner_case() {
        assert_eq!(display_label("boostIQ"), "BoostIQ");
    }

    #[test]
    fn table_preserves_model_order() {
        let speeds = FanSpeedTable::from_wire(vec!["max".to_string(), "quiet".to_string()]);
        assert_eq!(speeds.labels(), vec!["Max", "Quiet"]);
    }

    #[test]
    fn unknown_label_is_an_error() {
        let speeds = FanSpeedTable::default();
        assert!(speeds.is_empty());
        assert_eq!(
            speeds.wire_label("Max"),
            Err(ValueError::UnknownFanSpeed("Max".to_string()))
        );
    }
}
