//! Shared test utilities: a scripted stand-in for the vendor library.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use daq_driver_highfinesse::{ControlFlags, Result, VersionField, WlmBinding, WlmError};
use parking_lot::Mutex;

/// Values the fake library returns; edit through [`FakeWlm::state`].
#[derive(Debug, Clone)]
pub struct FakeState {
    pub server_running: bool,
    pub start_result: ControlFlags,
    pub model: i64,
    pub hardware_revision: i64,
    pub firmware_revision: i64,
    pub firmware_build: i64,
    pub temperature: f64,
    pub pressure: f64,
    /// Raw THz (or sentinel) per channel, index 0 = channel 1.
    pub frequencies: Vec<f64>,
    pub frequency_error: Option<WlmError>,
    pub operation_result: i64,
    pub operation_state: u16,
    pub exposure_result: i64,
    pub status: Result<()>,
    /// Calls received, in order.
    pub calls: Vec<String>,
}

impl Default for FakeState {
    fn default() -> Self {
        Self {
            server_running: true,
            start_result: ControlFlags::SERVER_STARTED,
            model: 7,
            hardware_revision: 2,
            firmware_revision: 581,
            firmware_build: 9114,
            temperature: 23.5,
            pressure: 1002.1,
            frequencies: vec![384.2304844685, 351.72571],
            frequency_error: None,
            operation_result: 0,
            operation_state: wlm_sys_codes::MEASUREMENT,
            exposure_result: 0,
            status: Ok(()),
            calls: Vec::new(),
        }
    }
}

/// Raw vendor values used by the fake without depending on `wlm-sys`.
pub mod wlm_sys_codes {
    pub const STOP: u16 = 0;
    pub const MEASUREMENT: u16 = 2;
    pub const START_MEASUREMENT: u16 = 2;
    pub const STOP_ALL: u16 = 0;
}

/// Cloneable fake binding; clones share state so tests can inspect calls
/// after handing one copy to the driver.
#[derive(Debug, Clone, Default)]
pub struct FakeWlm {
    pub state: Arc<Mutex<FakeState>>,
}

impl FakeWlm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(configure: impl FnOnce(&mut FakeState)) -> Self {
        let fake = Self::new();
        configure(&mut fake.state.lock());
        fake
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    fn record(&self, call: String) {
        self.state.lock().calls.push(call);
    }
}

impl WlmBinding for FakeWlm {
    fn server_running(&self) -> Result<bool> {
        self.record("server_running".into());
        Ok(self.state.lock().server_running)
    }

    fn start_server(&self, timeout: Duration) -> Result<ControlFlags> {
        self.record(format!("start_server({}ms)", timeout.as_millis()));
        Ok(self.state.lock().start_result)
    }

    fn version(&self, field: VersionField) -> Result<i64> {
        self.record(format!("version({:?})", field));
        let state = self.state.lock();
        Ok(match field {
            VersionField::Model => state.model,
            VersionField::HardwareRevision => state.hardware_revision,
            VersionField::FirmwareRevision => state.firmware_revision,
            VersionField::FirmwareBuild => state.firmware_build,
        })
    }

    fn temperature(&self) -> Result<f64> {
        self.record("temperature".into());
        Ok(self.state.lock().temperature)
    }

    fn pressure(&self) -> Result<f64> {
        self.record("pressure".into());
        Ok(self.state.lock().pressure)
    }

    fn frequency(&self, channel: u32) -> Result<f64> {
        self.record(format!("frequency({})", channel));
        let state = self.state.lock();
        if let Some(err) = &state.frequency_error {
            return Err(err.clone());
        }
        Ok(state
            .frequencies
            .get(channel as usize - 1)
            .copied()
            .unwrap_or(-12.0))
    }

    fn operation(&self, command: u16) -> Result<i64> {
        self.record(format!("operation({})", command));
        Ok(self.state.lock().operation_result)
    }

    fn operation_state(&self) -> Result<u16> {
        self.record("operation_state".into());
        Ok(self.state.lock().operation_state)
    }

    fn set_exposure_mode(&self, channel: u32, auto: bool) -> Result<i64> {
        self.record(format!("set_exposure_mode({}, {})", channel, auto));
        Ok(self.state.lock().exposure_result)
    }

    fn status(&self) -> Result<()> {
        self.record("status".into());
        self.state.lock().status.clone()
    }
}
