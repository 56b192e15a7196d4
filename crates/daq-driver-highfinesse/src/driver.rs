//! HighFinesse wavemeter adapter.
//!
//! [`HighFinesse`] owns either a connected vendor binding or nothing at all
//! (simulation). All operations are `async` so they can be awaited from the
//! RPC server's event loop, but none of them yield: each one runs to
//! completion against the vendor library before returning.

use std::path::Path;

use tracing::{debug, error, info, warn};

use crate::binding::{NativeWlm, WlmBinding};
use crate::connection::{ensure_server_running, read_identity};
use crate::error::{Quantity, Result, WlmError};
use crate::identity::{InstrumentIdentity, SIMULATOR_ID};
use crate::status::{describe_error, FrequencyReading, MeasurementStatus, OperationState};

/// Vendor frequencies are reported in THz.
const THZ_TO_HZ: f64 = 1e12;

/// Simulated housing temperature (°C).
pub const SIM_TEMPERATURE: f64 = 25.0;
/// Simulated internal pressure (mBar).
pub const SIM_PRESSURE: f64 = 1013.25;
/// Simulated frequency (Hz), identical on every channel.
pub const SIM_FREQUENCY_HZ: f64 = 123.456789e12;
/// Channels reported in simulation.
pub const SIM_CHANNELS: u32 = 2;

enum Backend {
    Simulated,
    Hardware {
        binding: Box<dyn WlmBinding>,
        identity: InstrumentIdentity,
    },
}

/// Wavemeter controller session.
///
/// Not shared between threads; callers serialize access (the RPC server
/// keeps it behind an async mutex).
pub struct HighFinesse {
    backend: Backend,
}

impl std::fmt::Debug for HighFinesse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.backend {
            Backend::Simulated => f.debug_struct("HighFinesse").field("simulated", &true).finish(),
            Backend::Hardware { identity, .. } => f
                .debug_struct("HighFinesse")
                .field("identity", identity)
                .finish(),
        }
    }
}

impl HighFinesse {
    /// A session that never touches the vendor library.
    pub fn simulated() -> Self {
        info!("Starting WLM in simulation mode");
        Self {
            backend: Backend::Simulated,
        }
    }

    /// Load the vendor library and connect to the instrument.
    ///
    /// `library` overrides the platform default library name.
    ///
    /// # Errors
    ///
    /// Any of the startup errors: [`WlmError::BindingUnavailable`],
    /// [`WlmError::ServerStartFailed`] or [`WlmError::UnrecognisedModel`].
    pub fn open(library: Option<&Path>) -> Result<Self> {
        let binding = NativeWlm::load(library)?;
        Self::connect(Box::new(binding))
    }

    /// Build a simulated or hardware session from process options.
    pub fn new(simulation: bool, library: Option<&Path>) -> Result<Self> {
        if simulation {
            Ok(Self::simulated())
        } else {
            Self::open(library)
        }
    }

    /// Run the handshake and identity read over an existing binding.
    pub fn connect(binding: Box<dyn WlmBinding>) -> Result<Self> {
        ensure_server_running(binding.as_ref())?;
        let identity = read_identity(binding.as_ref())?;

        info!(
            model = identity.model,
            hardware_revision = identity.hardware_revision,
            firmware = %format!("{}.{}", identity.firmware_revision, identity.firmware_build),
            channels = identity.channel_count(),
            "Connected to WLM"
        );

        Ok(Self {
            backend: Backend::Hardware { binding, identity },
        })
    }

    /// True if this session fabricates readings.
    pub fn is_simulated(&self) -> bool {
        matches!(self.backend, Backend::Simulated)
    }

    /// Identity read at connection time; `None` in simulation.
    pub fn identity(&self) -> Option<&InstrumentIdentity> {
        match &self.backend {
            Backend::Simulated => None,
            Backend::Hardware { identity, .. } => Some(identity),
        }
    }

    /// Number of detector channels.
    pub fn channel_count(&self) -> u32 {
        match &self.backend {
            Backend::Simulated => SIM_CHANNELS,
            Backend::Hardware { identity, .. } => identity.channel_count(),
        }
    }

    /// Asynchronous setup hook. Currently does nothing.
    pub async fn init(&mut self) -> Result<()> {
        Ok(())
    }

    /// Release hook. The vendor library is process-global and stays loaded.
    pub async fn close(&mut self) -> Result<()> {
        debug!("Closing WLM session");
        Ok(())
    }

    /// Human-readable instrument identification.
    pub async fn id(&self) -> String {
        match &self.backend {
            Backend::Simulated => SIMULATOR_ID.to_string(),
            Backend::Hardware { identity, .. } => identity.to_string(),
        }
    }

    /// Reserved status hook; succeeds unless the binding's probe fails.
    pub async fn get_status(&self) -> Result<()> {
        match &self.backend {
            Backend::Simulated => Ok(()),
            Backend::Hardware { binding, .. } => binding.status(),
        }
    }

    /// Liveness check.
    ///
    /// # Errors
    ///
    /// Only [`WlmError::Cancelled`] is returned; every other failure of the
    /// status probe is logged and reported as `Ok(false)`.
    pub async fn ping(&self) -> Result<bool> {
        if self.is_simulated() {
            return Ok(true);
        }

        match self.get_status().await {
            Ok(()) => Ok(true),
            Err(WlmError::Cancelled) => Err(WlmError::Cancelled),
            Err(err) => {
                warn!(error = %err, "WLM ping failed");
                Ok(false)
            }
        }
    }

    /// Housing temperature in °C.
    ///
    /// # Errors
    ///
    /// [`WlmError::ReadError`] if the library returns a negative sentinel.
    pub async fn get_temperature(&self) -> Result<f64> {
        match &self.backend {
            Backend::Simulated => Ok(SIM_TEMPERATURE),
            Backend::Hardware { binding, .. } => {
                check_scalar(Quantity::Temperature, binding.temperature()?)
            }
        }
    }

    /// Internal pressure in mBar.
    ///
    /// # Errors
    ///
    /// [`WlmError::ReadError`] if the library returns a negative sentinel.
    /// Units without a pressure sensor report -1006, see
    /// [`WlmError::is_pressure_unsupported`].
    pub async fn get_pressure(&self) -> Result<f64> {
        match &self.backend {
            Backend::Simulated => Ok(SIM_PRESSURE),
            Backend::Hardware { binding, .. } => {
                check_scalar(Quantity::Pressure, binding.pressure()?)
            }
        }
    }

    /// Frequency of a 1-based channel in Hz.
    ///
    /// Never fails: library faults and out-of-range channels are reported
    /// through the reading's status with a zero frequency.
    pub async fn get_frequency(&self, channel: u32) -> FrequencyReading {
        let (binding, identity) = match &self.backend {
            Backend::Simulated => return FrequencyReading::okay(SIM_FREQUENCY_HZ),
            Backend::Hardware { binding, identity } => (binding, identity),
        };

        let max = identity.channel_count();
        if channel == 0 || channel > max {
            error!(channel, max, "Frequency requested for invalid channel");
            return FrequencyReading::fault(MeasurementStatus::Error);
        }

        match binding.frequency(channel) {
            Ok(raw) => decode_frequency(channel, raw),
            Err(err) => {
                error!(channel, error = %err, "Error reading frequency");
                FrequencyReading::fault(MeasurementStatus::Error)
            }
        }
    }

    /// State of the vendor measurement loop.
    pub async fn get_operation_state(&self) -> Result<OperationState> {
        match &self.backend {
            Backend::Simulated => Ok(OperationState::Measurement),
            Backend::Hardware { binding, .. } => {
                Ok(OperationState::from_raw(binding.operation_state()?))
            }
        }
    }

    /// Start the vendor measurement loop.
    pub async fn start_measurement(&self) -> Result<()> {
        self.operation("cCtrlStartMeasurement", wlm_sys::cCtrlStartMeasurement)
    }

    /// Stop all vendor activity.
    pub async fn stop_measurement(&self) -> Result<()> {
        self.operation("cCtrlStopAll", wlm_sys::cCtrlStopAll)
    }

    /// Enable or disable automatic exposure on a 1-based channel.
    ///
    /// # Errors
    ///
    /// [`WlmError::InvalidChannel`] for a channel outside
    /// `1..=channel_count()`, [`WlmError::CommandFailed`] if the library
    /// rejects the setting.
    pub async fn set_auto_exposure(&self, channel: u32, enabled: bool) -> Result<()> {
        let max = self.channel_count();
        if channel == 0 || channel > max {
            return Err(WlmError::InvalidChannel { channel, max });
        }

        let binding = match &self.backend {
            Backend::Simulated => {
                debug!(channel, enabled, "Simulated auto exposure change");
                return Ok(());
            }
            Backend::Hardware { binding, .. } => binding,
        };

        let code = binding.set_exposure_mode(channel, enabled)?;
        if code < 0 {
            return Err(WlmError::CommandFailed {
                command: "SetExposureModeNum",
                code,
            });
        }
        info!(channel, enabled, "Auto exposure updated");
        Ok(())
    }

    fn operation(&self, command: &'static str, op: u16) -> Result<()> {
        let binding = match &self.backend {
            Backend::Simulated => {
                debug!(command, "Simulated operation");
                return Ok(());
            }
            Backend::Hardware { binding, .. } => binding,
        };

        let code = binding.operation(op)?;
        if code < 0 {
            return Err(WlmError::CommandFailed { command, code });
        }
        info!(command, "WLM operation issued");
        Ok(())
    }
}

fn check_scalar(quantity: Quantity, raw: f64) -> Result<f64> {
    if raw < 0.0 {
        return Err(WlmError::ReadError {
            quantity,
            code: raw,
        });
    }
    Ok(raw)
}

/// Translate a raw `GetFrequencyNum` result (THz or sentinel).
pub fn decode_frequency(channel: u32, raw: f64) -> FrequencyReading {
    if raw > 0.0 {
        return FrequencyReading::okay(raw * THZ_TO_HZ);
    }

    if raw == wlm_sys::ErrBigSignal as f64 {
        warn!(channel, "WLM channel over exposed");
        FrequencyReading::fault(MeasurementStatus::OverExposed)
    } else if raw == wlm_sys::ErrLowSignal as f64 {
        warn!(channel, "WLM channel under exposed");
        FrequencyReading::fault(MeasurementStatus::UnderExposed)
    } else {
        error!(channel, code = %describe_error(raw), "Error reading frequency");
        FrequencyReading::fault(MeasurementStatus::Error)
    }
}
