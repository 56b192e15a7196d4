//! Decoding of the `ControlWLMEx` result bitmask.
//!
//! Starting the vendor server returns a bitmask of outcome flags. The
//! handshake only needs to know whether `flServerStarted` is present;
//! everything else is reported as a warning. Both questions are answered by
//! [`ControlFlags`] so they can be checked independently.

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Outcome flags returned by `ControlWLMEx`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ControlFlags: u32 {
        /// Server is running
        const SERVER_STARTED = wlm_sys::flServerStarted as u32;
        /// No wavemeter found
        const ERR_DEVICE_NOT_FOUND = wlm_sys::flErrDeviceNotFound as u32;
        /// Driver failure
        const ERR_DRIVER_ERROR = wlm_sys::flErrDriverError as u32;
        /// USB communication failure
        const ERR_USB_ERROR = wlm_sys::flErrUSBError as u32;
        /// Unspecified device failure
        const ERR_UNKNOWN_DEVICE_ERROR = wlm_sys::flErrUnknownDeviceError as u32;
        /// Serial number mismatch
        const ERR_WRONG_SN = wlm_sys::flErrWrongSN as u32;
        /// Serial number not recognised
        const ERR_UNKNOWN_SN = wlm_sys::flErrUnknownSN as u32;
        /// Temperature sensor failure
        const ERR_TEMPERATURE_ERROR = wlm_sys::flErrTemperatureError as u32;
        /// Pressure sensor failure
        const ERR_PRESSURE_ERROR = wlm_sys::flErrPressureError as u32;
        /// Start cancelled by the user
        const ERR_CANCELLED_MANUALLY = wlm_sys::flErrCancelledManually as u32;
        /// Server busy
        const ERR_WLM_BUSY = wlm_sys::flErrWLMBusy as u32;
        /// Unspecified failure
        const ERR_UNKNOWN_ERROR = wlm_sys::flErrUnknownError as u32;
        /// No installed server version
        const NO_INSTALLED_VERSION_FOUND = wlm_sys::flNoInstalledVersionFound as u32;
        /// Requested server version not installed
        const DESIRED_VERSION_NOT_FOUND = wlm_sys::flDesiredVersionNotFound as u32;
        /// Calibration file missing
        const ERR_FILE_NOT_FOUND = wlm_sys::flErrFileNotFound as u32;
        /// Parameter out of range
        const ERR_PARM_OUT_OF_RANGE = wlm_sys::flErrParmOutOfRange as u32;
        /// Setting rejected
        const ERR_COULD_NOT_SET = wlm_sys::flErrCouldNotSet as u32;
        /// EEPROM access failed
        const ERR_EEPROM_FAILED = wlm_sys::flErrEEPROMFailed as u32;
        /// File access failed
        const ERR_FILE_FAILED = wlm_sys::flErrFileFailed as u32;
        /// Device data newer than file data
        const DEVICE_DATA_NEWER = wlm_sys::flDeviceDataNewer as u32;
        /// File data newer than device data
        const FILE_DATA_NEWER = wlm_sys::flFileDataNewer as u32;
        /// Device version too old
        const ERR_DEVICE_VERSION_OLD = wlm_sys::flErrDeviceVersionOld as u32;
        /// File version too old
        const ERR_FILE_VERSION_OLD = wlm_sys::flErrFileVersionOld as u32;
        /// Device stamp newer than file stamp
        const DEVICE_STAMP_NEWER = wlm_sys::flDeviceStampNewer as u32;
        /// File stamp newer than device stamp
        const FILE_STAMP_NEWER = wlm_sys::flFileStampNewer as u32;
    }
}

/// Vendor names, in bit order.
const VENDOR_NAMES: &[(ControlFlags, &str)] = &[
    (ControlFlags::SERVER_STARTED, "flServerStarted"),
    (ControlFlags::ERR_DEVICE_NOT_FOUND, "flErrDeviceNotFound"),
    (ControlFlags::ERR_DRIVER_ERROR, "flErrDriverError"),
    (ControlFlags::ERR_USB_ERROR, "flErrUSBError"),
    (ControlFlags::ERR_UNKNOWN_DEVICE_ERROR, "flErrUnknownDeviceError"),
    (ControlFlags::ERR_WRONG_SN, "flErrWrongSN"),
    (ControlFlags::ERR_UNKNOWN_SN, "flErrUnknownSN"),
    (ControlFlags::ERR_TEMPERATURE_ERROR, "flErrTemperatureError"),
    (ControlFlags::ERR_PRESSURE_ERROR, "flErrPressureError"),
    (ControlFlags::ERR_CANCELLED_MANUALLY, "flErrCancelledManually"),
    (ControlFlags::ERR_WLM_BUSY, "flErrWLMBusy"),
    (ControlFlags::ERR_UNKNOWN_ERROR, "flErrUnknownError"),
    (ControlFlags::NO_INSTALLED_VERSION_FOUND, "flNoInstalledVersionFound"),
    (ControlFlags::DESIRED_VERSION_NOT_FOUND, "flDesiredVersionNotFound"),
    (ControlFlags::ERR_FILE_NOT_FOUND, "flErrFileNotFound"),
    (ControlFlags::ERR_PARM_OUT_OF_RANGE, "flErrParmOutOfRange"),
    (ControlFlags::ERR_COULD_NOT_SET, "flErrCouldNotSet"),
    (ControlFlags::ERR_EEPROM_FAILED, "flErrEEPROMFailed"),
    (ControlFlags::ERR_FILE_FAILED, "flErrFileFailed"),
    (ControlFlags::DEVICE_DATA_NEWER, "flDeviceDataNewer"),
    (ControlFlags::FILE_DATA_NEWER, "flFileDataNewer"),
    (ControlFlags::ERR_DEVICE_VERSION_OLD, "flErrDeviceVersionOld"),
    (ControlFlags::ERR_FILE_VERSION_OLD, "flErrFileVersionOld"),
    (ControlFlags::DEVICE_STAMP_NEWER, "flDeviceStampNewer"),
    (ControlFlags::FILE_STAMP_NEWER, "flFileStampNewer"),
];

impl ControlFlags {
    /// Decode a raw `ControlWLMEx` result, keeping bits with no vendor name.
    pub fn from_raw(raw: i64) -> Self {
        Self::from_bits_retain(raw as u32)
    }

    /// True if the vendor server reported a successful start.
    pub fn server_started(&self) -> bool {
        self.contains(Self::SERVER_STARTED)
    }

    /// Vendor names of the flags present.
    pub fn names(&self) -> Vec<&'static str> {
        VENDOR_NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }

    /// Vendor names of every flag present other than `flServerStarted`.
    pub fn unexpected(&self) -> Vec<&'static str> {
        self.difference(Self::SERVER_STARTED).names()
    }

    /// Bits set in the raw result that match no known flag.
    pub fn unknown_bits(&self) -> u32 {
        self.bits() & !Self::all().bits()
    }
}

impl fmt::Display for ControlFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self.names().iter().map(|s| s.to_string()).collect();
        if self.unknown_bits() != 0 {
            parts.push(format!("{:#010x}", self.unknown_bits()));
        }
        write!(f, "{{{}}}", parts.join(", "))
    }
}
