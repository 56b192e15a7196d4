//! One-time handshake with the vendor server and identity read.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::binding::{VersionField, WlmBinding};
use crate::control::ControlFlags;
use crate::error::{Result, WlmError};
use crate::identity::InstrumentIdentity;

/// How long `ControlWLMEx` may wait for the vendor server to come up.
pub const SERVER_START_TIMEOUT: Duration = Duration::from_secs(10);

/// Make sure the vendor server application is running, starting it if not.
///
/// The server is a process-wide singleton owned by the vendor software; it is
/// started here when absent but never stopped.
///
/// # Errors
///
/// Returns [`WlmError::ServerStartFailed`] if the start command does not
/// report `flServerStarted`.
pub fn ensure_server_running(binding: &dyn WlmBinding) -> Result<()> {
    if binding.server_running()? {
        debug!("WLM server already running");
        return Ok(());
    }

    info!(
        timeout_ms = SERVER_START_TIMEOUT.as_millis() as u64,
        "Starting WLM server"
    );
    let flags = binding.start_server(SERVER_START_TIMEOUT)?;
    check_server_started(flags)
}

/// Accept a `ControlWLMEx` result if it reports a started server.
///
/// Other flags are logged as warnings and do not fail the handshake.
pub fn check_server_started(flags: ControlFlags) -> Result<()> {
    if !flags.server_started() {
        return Err(WlmError::ServerStartFailed { flags });
    }

    for flag in flags.unexpected() {
        warn!(flag, "Unexpected return code from ControlWLMEx");
    }
    if flags.unknown_bits() != 0 {
        warn!(
            bits = flags.unknown_bits(),
            "Unknown bits in ControlWLMEx result"
        );
    }

    Ok(())
}

/// Query the four version fields and validate the model.
pub fn read_identity(binding: &dyn WlmBinding) -> Result<InstrumentIdentity> {
    let model = binding.version(VersionField::Model)?;
    let hardware_revision = binding.version(VersionField::HardwareRevision)?;
    let firmware_revision = binding.version(VersionField::FirmwareRevision)?;
    let firmware_build = binding.version(VersionField::FirmwareBuild)?;

    InstrumentIdentity::new(model, hardware_revision, firmware_revision, firmware_build)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn test_started_is_accepted() {
        assert!(check_server_started(ControlFlags::SERVER_STARTED).is_ok());
    }

    #[test]
    fn test_missing_started_flag_fails() {
        let flags = ControlFlags::ERR_WLM_BUSY;
        assert_eq!(
            check_server_started(flags),
            Err(WlmError::ServerStartFailed { flags })
        );
    }

    #[test]
    #[traced_test]
    fn test_extra_flags_are_warned() {
        let flags = ControlFlags::SERVER_STARTED | ControlFlags::FILE_STAMP_NEWER;
        assert!(check_server_started(flags).is_ok());
        assert!(logs_contain("Unexpected return code from ControlWLMEx"));
        assert!(logs_contain("flFileStampNewer"));
    }
}
