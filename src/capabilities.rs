// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-model capability gate.
//!
//! A RoboVac model reports two bitmasks when its session is constructed:
//!
//! - [`FeatureMask`]: optional vacuum features (cleaning area, boost IQ, ...).
//!   It decides which optional [`DeviceState`](crate::state::DeviceState)
//!   fields the decoder populates.
//! - [`PlatformFeatures`]: the host-facing command surface (start, locate,
//!   fan speed, ...).
//!
//! Both are resolved once and never change for the life of a session. Every
//! model-dependent conditional in the decoder and the encoder goes through
//! [`Capabilities`].

use bitflags::bitflags;

use crate::error::Error;

bitflags! {
    /// Optional vacuum features reported by the model.
    ///
    /// # Examples
    ///
    /// ```
    /// use robovac_lib::FeatureMask;
    ///
    /// let mask = FeatureMask::resolve(0b0100_0100);
    /// assert!(mask.supports(FeatureMask::CLEANING_TIME));
    /// assert!(mask.supports(FeatureMask::CONSUMABLES));
    /// assert!(!mask.supports(FeatureMask::BOOST_IQ));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FeatureMask: u32 {
        /// Edge cleaning mode.
        const EDGE = 1;
        /// Small room cleaning mode.
        const SMALL_ROOM = 1 << 1;
        /// Reports cleaning time.
        const CLEANING_TIME = 1 << 2;
        /// Reports cleaning area.
        const CLEANING_AREA = 1 << 3;
        /// Do-not-disturb window.
        const DO_NOT_DISTURB = 1 << 4;
        /// Automatic return to base.
        const AUTO_RETURN = 1 << 5;
        /// Consumable wear counters.
        const CONSUMABLES = 1 << 6;
        /// Room-selective cleaning.
        const ROOM = 1 << 7;
        /// Zone cleaning.
        const ZONE = 1 << 8;
        /// Map support.
        const MAP = 1 << 9;
        /// Boost IQ carpet detection.
        const BOOST_IQ = 1 << 10;
    }
}

impl FeatureMask {
    /// Resolves the mask from transport-reported bits, dropping unknown bits.
    #[must_use]
    pub const fn resolve(bits: u32) -> Self {
        Self::from_bits_truncate(bits)
    }

    /// Returns whether every feature in `capability` is supported.
    #[must_use]
    pub const fn supports(self, capability: Self) -> bool {
        self.contains(capability)
    }
}

bitflags! {
    /// Host-facing command surface reported by the model.
    ///
    /// The bit values follow the host platform's vacuum feature flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PlatformFeatures: u32 {
        /// Pause cleaning.
        const PAUSE = 1 << 2;
        /// Stop cleaning.
        const STOP = 1 << 3;
        /// Return to the dock.
        const RETURN_HOME = 1 << 4;
        /// Fan speed selection.
        const FAN_SPEED = 1 << 5;
        /// Battery reporting.
        const BATTERY = 1 << 6;
        /// Free-form commands.
        const SEND_COMMAND = 1 << 8;
        /// Locate beep.
        const LOCATE = 1 << 9;
        /// Spot cleaning.
        const CLEAN_SPOT = 1 << 10;
        /// Map display.
        const MAP = 1 << 11;
        /// Activity state reporting.
        const STATE = 1 << 12;
        /// Start cleaning.
        const START = 1 << 13;
    }
}

impl PlatformFeatures {
    /// Resolves the features from transport-reported bits, dropping unknown bits.
    #[must_use]
    pub const fn resolve(bits: u32) -> Self {
        Self::from_bits_truncate(bits)
    }

    /// Returns whether every feature in `feature` is supported.
    #[must_use]
    pub const fn supports(self, feature: Self) -> bool {
        self.contains(feature)
    }
}

/// Resolved capabilities of a RoboVac model.
///
/// # Examples
///
/// ```
/// use robovac_lib::{Capabilities, FeatureMask, PlatformFeatures};
///
/// let caps = Capabilities::resolve(
///     (PlatformFeatures::START | PlatformFeatures::PAUSE).bits(),
///     FeatureMask::BOOST_IQ.bits(),
/// );
/// assert!(caps.platform().supports(PlatformFeatures::START));
/// assert!(caps.features().supports(FeatureMask::BOOST_IQ));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    platform: PlatformFeatures,
    features: FeatureMask,
}

impl Capabilities {
    /// Resolves capabilities from the two transport-reported bitmasks.
    #[must_use]
    pub const fn resolve(platform_bits: u32, feature_bits: u32) -> Self {
        Self {
            platform: PlatformFeatures::resolve(platform_bits),
            features: FeatureMask::resolve(feature_bits),
        }
    }

    /// Creates capabilities from already-resolved masks.
    #[must_use]
    pub const fn new(platform: PlatformFeatures, features: FeatureMask) -> Self {
        Self { platform, features }
    }

    /// Returns the host-facing feature set.
    #[must_use]
    pub const fn platform(&self) -> PlatformFeatures {
        self.platform
    }

    /// Returns the optional vacuum feature mask.
    #[must_use]
    pub const fn features(&self) -> FeatureMask {
        self.features
    }

    /// Fails with [`Error::CapabilityNotSupported`] unless `feature` is offered.
    ///
    /// # Errors
    ///
    /// Returns an error naming the missing capability.
    pub fn require_platform(
        &self,
        name: &'static str,
        feature: PlatformFeatures,
    ) -> Result<(), Error> {
        if self.platform.supports(feature) {
            Ok(())
        } else {
            Err(Error::CapabilityNotSupported(name))
        }
    }

    /// Fails with [`Error::CapabilityNotSupported`] unless `capability` is set.
    ///
    /// # Errors
    ///
    /// Returns an error naming the missing capability.
    pub fn require_feature(
        &self,
        name: &'static str,
        capability: FeatureMask,
    ) -> Result<(), Error> {
        if self.features.supports(capability) {
            Ok(())
        } else {
            Err(Error::CapabilityNotSupported(name))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_drops_unknown_bits() {
        let mask = FeatureMask::resolve(u32::MAX);
        assert_eq!(mask, FeatureMask::all());

        let platform = PlatformFeatures::resolve(1 | 2);
        assert!(platform.is_empty());
    }

    #[test]
    fn feature_bits_match_model_tables() {
        assert_eq!(FeatureMask::CLEANING_AREA.bits(), 8);
        assert_eq!(FeatureMask::CONSUMABLES.bits(), 64);
        assert_eq!(FeatureMask::BOOST_IQ.bits(), 1024);
        assert_eq!(PlatformFeatures::LOCATE.bits(), 512);
        assert_eq!(PlatformFeatures::START.bits(), 8192);
    }

    #[test]
    fn supports_requires_every_bit() {
        let mask = FeatureMask::AUTO_RETURN | FeatureMask::BOOST_IQ;
        assert!(mask.supports(FeatureMask::AUTO_RETURN));
        assert!(mask.supports(FeatureMask::AUTO_RETURN | FeatureMask::BOOST_IQ));
        assert!(!mask.supports(FeatureMask::AUTO_RETURN | FeatureMask::ROOM));
    }

    #[test]
    fn require_reports_missing_capability() {
        let caps = Capabilities::new(PlatformFeatures::START, FeatureMask::empty());

        assert!(caps.require_platform("start", PlatformFeatures::START).is_ok());
        let err = caps
            .require_feature("boost IQ", FeatureMask::BOOST_IQ)
            .unwrap_err();
        assert!(matches!(err, Error::CapabilityNotSupported("boost IQ")));
    }

    #[test]
    fn default_capabilities_are_empty() {
        let caps = Capabilities::default();
        assert!(caps.platform().is_empty());
        assert!(caps.features().is_empty());
    }
}
