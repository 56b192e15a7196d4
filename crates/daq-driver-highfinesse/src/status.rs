//! Measurement status model and vendor sentinel codes.

use std::fmt;

use serde::Serialize;

/// Outcome attached to every frequency reading.
///
/// The numeric codes are part of the remote interface: clients receive
/// `(status, frequency)` pairs with `status` as an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "u8")]
#[repr(u8)]
pub enum MeasurementStatus {
    /// Valid reading
    Okay = 0,
    /// Signal too weak to evaluate
    UnderExposed = 1,
    /// Signal saturates the detector
    OverExposed = 2,
    /// Any other fault
    Error = 3,
}

impl MeasurementStatus {
    /// Integer code sent to remote clients.
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl From<MeasurementStatus> for u8 {
    fn from(status: MeasurementStatus) -> Self {
        status.code()
    }
}

impl fmt::Display for MeasurementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Okay => write!(f, "OKAY"),
            Self::UnderExposed => write!(f, "UNDER_EXPOSED"),
            Self::OverExposed => write!(f, "OVER_EXPOSED"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// A per-channel frequency reading.
///
/// Any status other than [`MeasurementStatus::Okay`] carries a frequency of 0.
/// Serializes as the `[status, frequency_hz]` pair sent to remote clients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(into = "(MeasurementStatus, f64)")]
pub struct FrequencyReading {
    /// Measurement outcome
    pub status: MeasurementStatus,
    /// Frequency in Hz
    pub frequency_hz: f64,
}

impl FrequencyReading {
    /// A valid reading.
    pub fn okay(frequency_hz: f64) -> Self {
        Self {
            status: MeasurementStatus::Okay,
            frequency_hz,
        }
    }

    /// A fault; the value field is zeroed.
    pub fn fault(status: MeasurementStatus) -> Self {
        Self {
            status,
            frequency_hz: 0.0,
        }
    }
}

impl From<FrequencyReading> for (MeasurementStatus, f64) {
    fn from(reading: FrequencyReading) -> Self {
        (reading.status, reading.frequency_hz)
    }
}

/// Sentinel values the vendor library returns in place of a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum MeasurementError {
    NoValue,
    NoSignal,
    BadSignal,
    LowSignal,
    BigSignal,
    WlmMissing,
    NotAvailable,
    NothingChanged,
    NoPulse,
    ChannelNotAvailable,
    Div0,
    OutOfRange,
    UnitNotAvailable,
    TempNotMeasured,
    TempWlmMissing,
    TempNotAvailable,
}

impl MeasurementError {
    const ALL: [Self; 16] = [
        Self::NoValue,
        Self::NoSignal,
        Self::BadSignal,
        Self::LowSignal,
        Self::BigSignal,
        Self::WlmMissing,
        Self::NotAvailable,
        Self::NothingChanged,
        Self::NoPulse,
        Self::ChannelNotAvailable,
        Self::Div0,
        Self::OutOfRange,
        Self::UnitNotAvailable,
        Self::TempNotMeasured,
        Self::TempWlmMissing,
        Self::TempNotAvailable,
    ];

    /// Vendor code of this sentinel.
    pub fn code(self) -> i64 {
        let raw = match self {
            Self::NoValue => wlm_sys::ErrNoValue,
            Self::NoSignal => wlm_sys::ErrNoSignal,
            Self::BadSignal => wlm_sys::ErrBadSignal,
            Self::LowSignal => wlm_sys::ErrLowSignal,
            Self::BigSignal => wlm_sys::ErrBigSignal,
            Self::WlmMissing => wlm_sys::ErrWlmMissing,
            Self::NotAvailable => wlm_sys::ErrNotAvailable,
            Self::NothingChanged => wlm_sys::InfNothingChanged,
            Self::NoPulse => wlm_sys::ErrNoPulse,
            Self::ChannelNotAvailable => wlm_sys::ErrChannelNotAvailable,
            Self::Div0 => wlm_sys::ErrDiv0,
            Self::OutOfRange => wlm_sys::ErrOutOfRange,
            Self::UnitNotAvailable => wlm_sys::ErrUnitNotAvailable,
            Self::TempNotMeasured => wlm_sys::ErrTempNotMeasured,
            Self::TempWlmMissing => wlm_sys::ErrTempWlmMissing,
            Self::TempNotAvailable => wlm_sys::ErrTempNotAvailable,
        };
        i64::from(raw)
    }

    /// Vendor constant name.
    pub fn name(self) -> &'static str {
        match self {
            Self::NoValue => "ErrNoValue",
            Self::NoSignal => "ErrNoSignal",
            Self::BadSignal => "ErrBadSignal",
            Self::LowSignal => "ErrLowSignal",
            Self::BigSignal => "ErrBigSignal",
            Self::WlmMissing => "ErrWlmMissing",
            Self::NotAvailable => "ErrNotAvailable",
            Self::NothingChanged => "InfNothingChanged",
            Self::NoPulse => "ErrNoPulse",
            Self::ChannelNotAvailable => "ErrChannelNotAvailable",
            Self::Div0 => "ErrDiv0",
            Self::OutOfRange => "ErrOutOfRange",
            Self::UnitNotAvailable => "ErrUnitNotAvailable",
            Self::TempNotMeasured => "ErrTempNotMeasured",
            Self::TempWlmMissing => "ErrTempWlmMissing",
            Self::TempNotAvailable => "ErrTempNotAvailable",
        }
    }

    /// Match a raw library return value against the known sentinels.
    pub fn from_raw(raw: f64) -> Option<Self> {
        Self::ALL.into_iter().find(|err| err.code() as f64 == raw)
    }
}

impl fmt::Display for MeasurementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

/// Describe a raw library return value for logging.
pub fn describe_error(raw: f64) -> String {
    match MeasurementError::from_raw(raw) {
        Some(err) => err.to_string(),
        None => format!("unknown error code {}", raw),
    }
}

/// Vendor measurement loop state from `GetOperationState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationState {
    /// Measurement stopped
    Stop,
    /// Adjustment mode
    Adjustment,
    /// Measuring
    Measurement,
    /// Value not defined by the vendor constants
    Unknown(u16),
}

impl OperationState {
    /// Convert from the raw vendor value.
    pub fn from_raw(raw: u16) -> Self {
        match raw {
            wlm_sys::cStop => Self::Stop,
            wlm_sys::cAdjustment => Self::Adjustment,
            wlm_sys::cMeasurement => Self::Measurement,
            other => Self::Unknown(other),
        }
    }

    /// Raw vendor value.
    pub fn code(self) -> u16 {
        match self {
            Self::Stop => wlm_sys::cStop,
            Self::Adjustment => wlm_sys::cAdjustment,
            Self::Measurement => wlm_sys::cMeasurement,
            Self::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for OperationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stop => write!(f, "stop"),
            Self::Adjustment => write!(f, "adjustment"),
            Self::Measurement => write!(f, "measurement"),
            Self::Unknown(raw) => write!(f, "unknown({})", raw),
        }
    }
}
