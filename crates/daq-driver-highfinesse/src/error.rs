//! Error types for wavemeter operations.
//!
//! Construction-time failures (`BindingUnavailable`, `ServerStartFailed`,
//! `UnrecognisedModel`) abort startup. Scalar sensor reads surface
//! `ReadError` to the caller. Per-channel frequency faults are never errors;
//! they are reported through [`MeasurementStatus`](crate::MeasurementStatus).

use std::fmt;

use thiserror::Error;

use crate::control::ControlFlags;

/// Result type alias for wavemeter operations.
pub type Result<T> = std::result::Result<T, WlmError>;

/// Errors that can occur when working with the wavemeter.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WlmError {
    /// Vendor library could not be loaded or lacks a required entry point
    #[error("Failed to load WLM library '{library}' (is the HighFinesse software installed?): {message}")]
    BindingUnavailable {
        /// Library name or path
        library: String,
        /// Loader error
        message: String,
    },

    /// Vendor server application could not be confirmed running
    #[error("Error starting WLM server application: {flags}")]
    ServerStartFailed {
        /// Decoded `ControlWLMEx` result
        flags: ControlFlags,
    },

    /// Identity read returned a model outside the supported range
    #[error("Unrecognised WLM model: {model}")]
    UnrecognisedModel {
        /// Reported model number
        model: i64,
    },

    /// Scalar sensor read returned a negative sentinel
    #[error("Error reading WLM {quantity}: {code}")]
    ReadError {
        /// Quantity being read
        quantity: Quantity,
        /// Raw sentinel returned
        code: f64,
    },

    /// Channel outside `1..=max`
    #[error("Invalid channel {channel}: wavemeter has {max} channels")]
    InvalidChannel {
        /// Requested channel
        channel: u32,
        /// Highest valid channel
        max: u32,
    },

    /// Vendor command returned a negative result
    #[error("WLM command {command} failed with code {code}")]
    CommandFailed {
        /// Vendor command name
        command: &'static str,
        /// Negative result code
        code: i64,
    },

    /// Failure reported by the binding itself rather than a vendor result
    #[error("WLM library call failed: {message}")]
    Library {
        /// Failure description
        message: String,
    },

    /// The operation was cancelled by its caller
    #[error("Operation cancelled")]
    Cancelled,
}

/// Scalar quantity read from the wavemeter housing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    /// Housing temperature (°C)
    Temperature,
    /// Internal pressure (mBar)
    Pressure,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Temperature => write!(f, "temperature"),
            Self::Pressure => write!(f, "pressure"),
        }
    }
}

impl WlmError {
    /// Check if this error is a cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Check if this error can only occur while establishing the session.
    pub fn is_startup(&self) -> bool {
        matches!(
            self,
            Self::BindingUnavailable { .. }
                | Self::ServerStartFailed { .. }
                | Self::UnrecognisedModel { .. }
        )
    }

    /// Check if this is the vendor's "pressure not supported" result (-1006).
    pub fn is_pressure_unsupported(&self) -> bool {
        match self {
            Self::ReadError {
                quantity: Quantity::Pressure,
                code,
            } => *code == wlm_sys::ErrTempNotAvailable as f64,
            _ => false,
        }
    }

    /// Short name of the variant, used when errors cross the RPC boundary.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BindingUnavailable { .. } => "BindingUnavailable",
            Self::ServerStartFailed { .. } => "ServerStartFailed",
            Self::UnrecognisedModel { .. } => "UnrecognisedModel",
            Self::ReadError { .. } => "ReadError",
            Self::InvalidChannel { .. } => "InvalidChannel",
            Self::CommandFailed { .. } => "CommandFailed",
            Self::Library { .. } => "Library",
            Self::Cancelled => "Cancelled",
        }
    }
}
