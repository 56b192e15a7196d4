//! Low-level runtime bindings for the HighFinesse `wlmData` library.
//!
//! The vendor ships the wavemeter API as a shared library (`wlmData.dll` on
//! Windows, `libwlmData.so` on Linux) that talks to a background server
//! application. This crate loads that library at runtime and resolves the
//! fixed table of entry points the controller needs, each with its exact
//! argument and return types, so values cross the boundary without
//! reinterpretation.
//!
//! Nothing here is linked at build time: the workspace builds and tests on
//! machines without the vendor software installed, and [`WlmApi::load`]
//! reports the missing library at runtime instead.
//!
//! # Safety
//!
//! Every function pointer in [`WlmApi`] is an `unsafe` foreign call. For a
//! safe wrapper use the `daq-driver-highfinesse` crate.
//!
//! # Example (unsafe)
//!
//! ```no_run
//! use wlm_sys::{WlmApi, DEFAULT_LIBRARY, cVersionType};
//!
//! # fn example() -> Result<(), wlm_sys::LoadError> {
//! let api = unsafe { WlmApi::load(DEFAULT_LIBRARY)? };
//! let model = unsafe { (api.get_wlm_version)(cVersionType) };
//! println!("WLM model {}", model);
//! # Ok(())
//! # }
//! ```

#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]
#![allow(unsafe_code)]

#[allow(missing_docs)]
mod consts;

pub use consts::*;
pub use libloading::Error as LoadError;

use libloading::Library;
use std::ffi::OsStr;
use std::os::raw::{c_double, c_long, c_ushort};

/// Pointer-sized integer the vendor API uses for application handles.
pub type lref = isize;

/// `long Instantiate(long RFC, long Mode, long P1, long P2)`
pub type InstantiateFn = unsafe extern "system" fn(c_long, c_long, c_long, c_long) -> c_long;
/// `long ControlWLMEx(long Action, lref App, long Ver, long Delay, long Res)`
pub type ControlWlmExFn = unsafe extern "system" fn(c_long, lref, c_long, c_long, c_long) -> c_long;
/// `long GetWLMVersion(long Ver)`
pub type GetWlmVersionFn = unsafe extern "system" fn(c_long) -> c_long;
/// `long Operation(unsigned short Op)`
pub type OperationFn = unsafe extern "system" fn(c_ushort) -> c_long;
/// `unsigned short GetOperationState(unsigned short OS)`
pub type GetOperationStateFn = unsafe extern "system" fn(c_ushort) -> c_ushort;
/// `double GetTemperature(double T)`
pub type GetTemperatureFn = unsafe extern "system" fn(c_double) -> c_double;
/// `double GetPressure(double P)`
pub type GetPressureFn = unsafe extern "system" fn(c_double) -> c_double;
/// `long SetExposureModeNum(long num, bool EM)`
pub type SetExposureModeNumFn = unsafe extern "system" fn(c_long, bool) -> c_long;
/// `double GetFrequencyNum(long num, double F)`
pub type GetFrequencyNumFn = unsafe extern "system" fn(c_long, c_double) -> c_double;

/// Platform file name of the vendor library.
#[cfg(windows)]
pub const DEFAULT_LIBRARY: &str = "wlmData.dll";
/// Platform file name of the vendor library.
#[cfg(not(windows))]
pub const DEFAULT_LIBRARY: &str = "libwlmData.so";

/// Resolved entry points of a loaded `wlmData` library.
///
/// The function pointers stay valid for as long as this value lives, since it
/// owns the library handle.
#[allow(missing_docs)]
pub struct WlmApi {
    pub instantiate: InstantiateFn,
    pub control_wlm_ex: ControlWlmExFn,
    pub get_wlm_version: GetWlmVersionFn,
    pub operation: OperationFn,
    pub get_operation_state: GetOperationStateFn,
    pub get_temperature: GetTemperatureFn,
    pub get_pressure: GetPressureFn,
    pub set_exposure_mode_num: SetExposureModeNumFn,
    pub get_frequency_num: GetFrequencyNumFn,
    _library: Library,
}

impl WlmApi {
    /// Load the vendor library from `path` and resolve every entry point.
    ///
    /// `path` may be a bare file name (searched the platform way) or a full
    /// path.
    ///
    /// # Errors
    ///
    /// Fails if the library cannot be loaded or any symbol is missing.
    ///
    /// # Safety
    ///
    /// Loading runs the library's initialisation routines, and the resolved
    /// symbols are trusted to have the declared signatures.
    pub unsafe fn load<P: AsRef<OsStr>>(path: P) -> Result<Self, LoadError> {
        let library = Library::new(path)?;

        let instantiate: InstantiateFn = *library.get(b"Instantiate\0")?;
        let control_wlm_ex: ControlWlmExFn = *library.get(b"ControlWLMEx\0")?;
        let get_wlm_version: GetWlmVersionFn = *library.get(b"GetWLMVersion\0")?;
        let operation: OperationFn = *library.get(b"Operation\0")?;
        let get_operation_state: GetOperationStateFn = *library.get(b"GetOperationState\0")?;
        let get_temperature: GetTemperatureFn = *library.get(b"GetTemperature\0")?;
        let get_pressure: GetPressureFn = *library.get(b"GetPressure\0")?;
        let set_exposure_mode_num: SetExposureModeNumFn = *library.get(b"SetExposureModeNum\0")?;
        let get_frequency_num: GetFrequencyNumFn = *library.get(b"GetFrequencyNum\0")?;

        Ok(Self {
            instantiate,
            control_wlm_ex,
            get_wlm_version,
            operation,
            get_operation_state,
            get_temperature,
            get_pressure,
            set_exposure_mode_num,
            get_frequency_num,
            _library: library,
        })
    }
}

impl std::fmt::Debug for WlmApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WlmApi").finish_non_exhaustive()
    }
}
