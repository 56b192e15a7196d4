//! Safe, typed access to the vendor library.
//!
//! [`WlmBinding`] is the narrow method set the adapter needs. [`NativeWlm`]
//! implements it on top of the `wlm-sys` function table; tests substitute
//! scripted implementations.

#![allow(unsafe_code)]

use std::ffi::OsString;
use std::os::raw::c_long;
use std::path::Path;
use std::time::Duration;

use tracing::{debug, info};
use wlm_sys::WlmApi;

use crate::control::ControlFlags;
use crate::error::{Result, WlmError};

/// Selector for `GetWLMVersion`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionField {
    /// Wavemeter model
    Model,
    /// Hardware revision
    HardwareRevision,
    /// Firmware revision
    FirmwareRevision,
    /// Firmware build
    FirmwareBuild,
}

impl VersionField {
    fn selector(self) -> c_long {
        match self {
            Self::Model => wlm_sys::cVersionType,
            Self::HardwareRevision => wlm_sys::cVersionHardwareRevision,
            Self::FirmwareRevision => wlm_sys::cVersionFirmwareRevision,
            Self::FirmwareBuild => wlm_sys::cVersionFirmwareBuild,
        }
    }
}

/// Typed calls into the wavemeter library.
///
/// Methods return raw vendor values (sentinels included); interpreting them
/// is the adapter's job. An `Err` means the call itself failed.
pub trait WlmBinding: Send + Sync {
    /// Whether the vendor server application is running.
    fn server_running(&self) -> Result<bool>;

    /// Start the vendor server (showing its window) and wait up to `timeout`.
    fn start_server(&self, timeout: Duration) -> Result<ControlFlags>;

    /// One `GetWLMVersion` query.
    fn version(&self, field: VersionField) -> Result<i64>;

    /// Raw housing temperature in °C.
    fn temperature(&self) -> Result<f64>;

    /// Raw internal pressure in mBar.
    fn pressure(&self) -> Result<f64>;

    /// Raw frequency of a 1-based channel in THz.
    fn frequency(&self, channel: u32) -> Result<f64>;

    /// Issue an `Operation` command.
    fn operation(&self, command: u16) -> Result<i64>;

    /// Raw `GetOperationState` value.
    fn operation_state(&self) -> Result<u16>;

    /// Switch automatic exposure for a 1-based channel.
    fn set_exposure_mode(&self, channel: u32, auto: bool) -> Result<i64>;

    /// Status probe used by `ping`; the vendor library offers no cheap check.
    fn status(&self) -> Result<()> {
        Ok(())
    }
}

/// The vendor library loaded into this process.
#[derive(Debug)]
pub struct NativeWlm {
    api: WlmApi,
}

impl NativeWlm {
    /// Load the vendor library, from `path` or the platform default name.
    ///
    /// # Errors
    ///
    /// Returns [`WlmError::BindingUnavailable`] if the library cannot be
    /// loaded or lacks an entry point.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let target: OsString = path
            .map(|p| p.as_os_str().to_owned())
            .unwrap_or_else(|| OsString::from(wlm_sys::DEFAULT_LIBRARY));
        let library = target.to_string_lossy().into_owned();

        debug!(library = %library, "Loading WLM library");

        // SAFETY: wlmData has no load-time side effects beyond connecting to
        // the vendor server, and the symbol table matches the vendor header.
        let api = unsafe { WlmApi::load(&target) }.map_err(|e| WlmError::BindingUnavailable {
            library: library.clone(),
            message: e.to_string(),
        })?;

        info!(library = %library, "Loaded WLM library");

        Ok(Self { api })
    }
}

// SAFETY (all calls below): each function pointer was resolved by
// `WlmApi::load` with the signature declared in the vendor header, and the
// library stays loaded for the lifetime of `self.api`.
impl WlmBinding for NativeWlm {
    fn server_running(&self) -> Result<bool> {
        let running = unsafe { (self.api.instantiate)(wlm_sys::cInstCheckForWLM, 0, 0, 0) };
        Ok(running != 0)
    }

    fn start_server(&self, timeout: Duration) -> Result<ControlFlags> {
        let delay = c_long::try_from(timeout.as_millis()).unwrap_or(c_long::MAX);
        let raw = unsafe {
            (self.api.control_wlm_ex)(
                wlm_sys::cCtrlWLMShow | wlm_sys::cCtrlWLMWait,
                0,
                0,
                delay,
                1,
            )
        };
        Ok(ControlFlags::from_raw(i64::from(raw)))
    }

    fn version(&self, field: VersionField) -> Result<i64> {
        let raw = unsafe { (self.api.get_wlm_version)(field.selector()) };
        Ok(i64::from(raw))
    }

    fn temperature(&self) -> Result<f64> {
        Ok(unsafe { (self.api.get_temperature)(0.0) })
    }

    fn pressure(&self) -> Result<f64> {
        Ok(unsafe { (self.api.get_pressure)(0.0) })
    }

    fn frequency(&self, channel: u32) -> Result<f64> {
        let num = c_long::try_from(channel).map_err(|_| WlmError::Library {
            message: format!("channel {} does not fit the vendor argument", channel),
        })?;
        Ok(unsafe { (self.api.get_frequency_num)(num, 0.0) })
    }

    fn operation(&self, command: u16) -> Result<i64> {
        let raw = unsafe { (self.api.operation)(command) };
        Ok(i64::from(raw))
    }

    fn operation_state(&self) -> Result<u16> {
        Ok(unsafe { (self.api.get_operation_state)(0) })
    }

    fn set_exposure_mode(&self, channel: u32, auto: bool) -> Result<i64> {
        let num = c_long::try_from(channel).map_err(|_| WlmError::Library {
            message: format!("channel {} does not fit the vendor argument", channel),
        })?;
        let raw = unsafe { (self.api.set_exposure_mode_num)(num, auto) };
        Ok(i64::from(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_library_is_binding_unavailable() {
        let err = NativeWlm::load(Some(Path::new("/nonexistent/libwlmData.so"))).unwrap_err();
        match err {
            WlmError::BindingUnavailable { library, .. } => {
                assert_eq!(library, "/nonexistent/libwlmData.so");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_version_selectors() {
        assert_eq!(VersionField::Model.selector(), 0);
        assert_eq!(VersionField::FirmwareBuild.selector(), 3);
    }
}
