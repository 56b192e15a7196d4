// Constants from the vendor's wlmConst header.

use std::os::raw::{c_long, c_ushort};

// Instantiate: request codes
pub const cInstCheckForWLM: c_long = -1;
pub const cInstResetCalc: c_long = 0;
pub const cInstReturnMode: c_long = cInstResetCalc;
pub const cInstNotification: c_long = 1;
pub const cInstCopyPattern: c_long = 2;
pub const cInstControlWLM: c_long = 3;

// ControlWLM / ControlWLMEx: action flags
pub const cCtrlWLMShow: c_long = 0x0001;
pub const cCtrlWLMHide: c_long = 0x0002;
pub const cCtrlWLMExit: c_long = 0x0003;
pub const cCtrlWLMStore: c_long = 0x0004;
pub const cCtrlWLMCompare: c_long = 0x0005;
pub const cCtrlWLMWait: c_long = 0x0010;
pub const cCtrlWLMStartSilent: c_long = 0x0020;
pub const cCtrlWLMSilent: c_long = 0x0040;
pub const cCtrlWLMStartDelay: c_long = 0x0080;

// ControlWLM / ControlWLMEx: result bitmask
pub const flServerStarted: c_long = 0x0000_0001;
pub const flErrDeviceNotFound: c_long = 0x0000_0002;
pub const flErrDriverError: c_long = 0x0000_0004;
pub const flErrUSBError: c_long = 0x0000_0008;
pub const flErrUnknownDeviceError: c_long = 0x0000_0010;
pub const flErrWrongSN: c_long = 0x0000_0020;
pub const flErrUnknownSN: c_long = 0x0000_0040;
pub const flErrTemperatureError: c_long = 0x0000_0080;
pub const flErrPressureError: c_long = 0x0000_0100;
pub const flErrCancelledManually: c_long = 0x0000_0200;
pub const flErrWLMBusy: c_long = 0x0000_0400;
pub const flErrUnknownError: c_long = 0x0000_1000;
pub const flNoInstalledVersionFound: c_long = 0x0000_2000;
pub const flDesiredVersionNotFound: c_long = 0x0000_4000;
pub const flErrFileNotFound: c_long = 0x0000_8000;
pub const flErrParmOutOfRange: c_long = 0x0001_0000;
pub const flErrCouldNotSet: c_long = 0x0002_0000;
pub const flErrEEPROMFailed: c_long = 0x0004_0000;
pub const flErrFileFailed: c_long = 0x0008_0000;
pub const flDeviceDataNewer: c_long = 0x0010_0000;
pub const flFileDataNewer: c_long = 0x0020_0000;
pub const flErrDeviceVersionOld: c_long = 0x0040_0000;
pub const flErrFileVersionOld: c_long = 0x0080_0000;
pub const flDeviceStampNewer: c_long = 0x0100_0000;
pub const flFileStampNewer: c_long = 0x0200_0000;

// Operation: commands
pub const cCtrlStopAll: c_ushort = 0x0000;
pub const cCtrlStartAdjustment: c_ushort = 0x0001;
pub const cCtrlStartMeasurement: c_ushort = 0x0002;
pub const cCtrlStartRecord: c_ushort = 0x0004;
pub const cCtrlStartReplay: c_ushort = 0x0008;
pub const cCtrlStoreArray: c_ushort = 0x0010;
pub const cCtrlLoadArray: c_ushort = 0x0020;

// GetOperationState: results
pub const cStop: c_ushort = 0;
pub const cAdjustment: c_ushort = 1;
pub const cMeasurement: c_ushort = 2;

// GetWLMVersion: selector
pub const cVersionType: c_long = 0;
pub const cVersionHardwareRevision: c_long = 1;
pub const cVersionFirmwareRevision: c_long = 2;
pub const cVersionFirmwareBuild: c_long = 3;

// Measurement sentinels returned in place of a value
pub const ErrNoValue: c_long = 0;
pub const ErrNoSignal: c_long = -1;
pub const ErrBadSignal: c_long = -2;
pub const ErrLowSignal: c_long = -3;
pub const ErrBigSignal: c_long = -4;
pub const ErrWlmMissing: c_long = -5;
pub const ErrNotAvailable: c_long = -6;
pub const InfNothingChanged: c_long = -7;
pub const ErrNoPulse: c_long = -8;
pub const ErrChannelNotAvailable: c_long = -10;
pub const ErrDiv0: c_long = -13;
pub const ErrOutOfRange: c_long = -14;
pub const ErrUnitNotAvailable: c_long = -15;

// Temperature and pressure reads share a -1000 offset
pub const ErrTemperature: c_long = -1000;
pub const ErrTempNotMeasured: c_long = ErrTemperature + ErrNoValue;
pub const ErrTempNotAvailable: c_long = ErrTemperature + ErrNotAvailable;
pub const ErrTempWlmMissing: c_long = ErrTemperature + ErrWlmMissing;
