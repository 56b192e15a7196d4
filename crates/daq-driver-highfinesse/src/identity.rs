//! Instrument identity read once at connection time.

use std::fmt;
use std::ops::RangeInclusive;

use crate::error::{Result, WlmError};

/// Models this driver knows how to talk to (WS/5 through WS/10).
pub const SUPPORTED_MODELS: RangeInclusive<i64> = 5..=10;

/// First model with a second detector (WS/6 has one CCD, WS/7 and up have two).
pub const DUAL_CHANNEL_MODEL: i64 = 7;

/// Identification string returned in simulation mode.
pub const SIMULATOR_ID: &str = "WLM simulator";

/// Model and revision numbers reported by `GetWLMVersion`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstrumentIdentity {
    /// Wavemeter model (e.g. 6 for a WS/6)
    pub model: i64,
    /// Hardware revision
    pub hardware_revision: i64,
    /// Firmware revision
    pub firmware_revision: i64,
    /// Firmware build number
    pub firmware_build: i64,
}

impl InstrumentIdentity {
    /// Validate raw version numbers.
    ///
    /// # Errors
    ///
    /// Returns [`WlmError::UnrecognisedModel`] if `model` is outside
    /// [`SUPPORTED_MODELS`].
    pub fn new(
        model: i64,
        hardware_revision: i64,
        firmware_revision: i64,
        firmware_build: i64,
    ) -> Result<Self> {
        if !SUPPORTED_MODELS.contains(&model) {
            return Err(WlmError::UnrecognisedModel { model });
        }

        Ok(Self {
            model,
            hardware_revision,
            firmware_revision,
            firmware_build,
        })
    }

    /// Number of detector channels.
    pub fn channel_count(&self) -> u32 {
        if self.model >= DUAL_CHANNEL_MODEL {
            2
        } else {
            1
        }
    }
}

impl fmt::Display for InstrumentIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WLM {} rev {}, firmware {}.{}",
            self.model, self.hardware_revision, self.firmware_revision, self.firmware_build
        )
    }
}
