//! Hardware-mode behaviour against a scripted vendor library.

mod common;

use common::{wlm_sys_codes, FakeWlm};
use daq_driver_highfinesse::{
    ControlFlags, FrequencyReading, HighFinesse, MeasurementStatus, OperationState, Quantity,
    WlmError,
};
use tracing_test::traced_test;

fn connect(fake: &FakeWlm) -> HighFinesse {
    HighFinesse::connect(Box::new(fake.clone())).unwrap()
}

#[test]
fn test_handshake_skips_start_when_running() {
    let fake = FakeWlm::new();
    let wlm = connect(&fake);

    assert!(!wlm.is_simulated());
    assert_eq!(
        fake.calls(),
        vec![
            "server_running",
            "version(Model)",
            "version(HardwareRevision)",
            "version(FirmwareRevision)",
            "version(FirmwareBuild)",
        ]
    );
}

#[test]
fn test_handshake_starts_server_with_timeout() {
    let fake = FakeWlm::with(|s| s.server_running = false);
    connect(&fake);
    assert_eq!(fake.calls()[1], "start_server(10000ms)");
}

#[test]
fn test_server_start_failure() {
    let flags = ControlFlags::ERR_DEVICE_NOT_FOUND | ControlFlags::ERR_USB_ERROR;
    let fake = FakeWlm::with(|s| {
        s.server_running = false;
        s.start_result = flags;
    });

    let err = HighFinesse::connect(Box::new(fake)).unwrap_err();
    assert_eq!(err, WlmError::ServerStartFailed { flags });
    assert_eq!(
        err.to_string(),
        "Error starting WLM server application: {flErrDeviceNotFound, flErrUSBError}"
    );
}

#[test]
#[traced_test]
fn test_unexpected_start_flags_are_warnings() {
    let fake = FakeWlm::with(|s| {
        s.server_running = false;
        s.start_result = ControlFlags::SERVER_STARTED | ControlFlags::DEVICE_DATA_NEWER;
    });

    connect(&fake);
    assert!(logs_contain("Unexpected return code from ControlWLMEx"));
    assert!(logs_contain("flDeviceDataNewer"));
}

#[test]
fn test_channel_count_follows_model() {
    for (model, channels) in [(5, 1), (6, 1), (7, 2), (8, 2), (10, 2)] {
        let wlm = connect(&FakeWlm::with(|s| s.model = model));
        assert_eq!(wlm.channel_count(), channels, "model {}", model);
    }
}

#[test]
fn test_unrecognised_model() {
    for model in [4, 11] {
        let fake = FakeWlm::with(|s| s.model = model);
        assert_eq!(
            HighFinesse::connect(Box::new(fake)).unwrap_err(),
            WlmError::UnrecognisedModel { model }
        );
    }
}

#[tokio::test]
async fn test_id() {
    let wlm = connect(&FakeWlm::new());
    assert_eq!(wlm.id().await, "WLM 7 rev 2, firmware 581.9114");
    assert_eq!(wlm.identity().unwrap().model, 7);
}

#[tokio::test]
async fn test_frequency_conversion() {
    let fake = FakeWlm::new();
    let wlm = connect(&fake);

    let reading = wlm.get_frequency(1).await;
    assert_eq!(reading, FrequencyReading::okay(384.2304844685 * 1e12));

    let reading = wlm.get_frequency(2).await;
    assert_eq!(reading.frequency_hz, 351.72571 * 1e12);
    assert!(fake.calls().contains(&"frequency(2)".to_string()));
}

#[tokio::test]
async fn test_frequency_faults_are_data() {
    let fake = FakeWlm::with(|s| s.frequencies = vec![-4.0, -3.0]);
    let wlm = connect(&fake);

    assert_eq!(
        wlm.get_frequency(1).await,
        FrequencyReading::fault(MeasurementStatus::OverExposed)
    );
    assert_eq!(
        wlm.get_frequency(2).await,
        FrequencyReading::fault(MeasurementStatus::UnderExposed)
    );

    fake.state.lock().frequencies = vec![0.0, -5.0];
    assert_eq!(wlm.get_frequency(1).await.status, MeasurementStatus::Error);
    assert_eq!(wlm.get_frequency(2).await.status, MeasurementStatus::Error);
}

#[tokio::test]
#[traced_test]
async fn test_frequency_library_failure_is_data() {
    let fake = FakeWlm::with(|s| {
        s.frequency_error = Some(WlmError::Library {
            message: "server gone".into(),
        })
    });
    let wlm = connect(&fake);

    let reading = wlm.get_frequency(1).await;
    assert_eq!(reading, FrequencyReading::fault(MeasurementStatus::Error));
    assert!(logs_contain("server gone"));
}

#[tokio::test]
async fn test_frequency_invalid_channel_skips_library() {
    let fake = FakeWlm::with(|s| s.model = 6);
    let wlm = connect(&fake);

    for channel in [0, 2] {
        let reading = wlm.get_frequency(channel).await;
        assert_eq!(reading, FrequencyReading::fault(MeasurementStatus::Error));
    }
    assert!(!fake.calls().iter().any(|c| c.starts_with("frequency")));
}

#[tokio::test]
async fn test_scalar_reads() {
    let fake = FakeWlm::new();
    let wlm = connect(&fake);
    assert_eq!(wlm.get_temperature().await.unwrap(), 23.5);
    assert_eq!(wlm.get_pressure().await.unwrap(), 1002.1);

    fake.state.lock().temperature = 0.0;
    assert_eq!(wlm.get_temperature().await.unwrap(), 0.0);
}

#[tokio::test]
async fn test_negative_scalar_reads_fail() {
    let fake = FakeWlm::with(|s| {
        s.temperature = -1000.0;
        s.pressure = -1006.0;
    });
    let wlm = connect(&fake);

    let err = wlm.get_temperature().await.unwrap_err();
    assert_eq!(
        err,
        WlmError::ReadError {
            quantity: Quantity::Temperature,
            code: -1000.0
        }
    );
    assert!(!err.is_pressure_unsupported());

    let err = wlm.get_pressure().await.unwrap_err();
    assert!(err.is_pressure_unsupported());
}

#[tokio::test]
async fn test_ping() {
    let fake = FakeWlm::new();
    let wlm = connect(&fake);
    assert!(wlm.ping().await.unwrap());

    fake.state.lock().status = Err(WlmError::Library {
        message: "no reply".into(),
    });
    assert!(!wlm.ping().await.unwrap());
    assert!(wlm.get_status().await.is_err());

    fake.state.lock().status = Err(WlmError::Cancelled);
    assert!(wlm.ping().await.unwrap_err().is_cancelled());
}

#[tokio::test]
async fn test_measurement_control() {
    let fake = FakeWlm::new();
    let wlm = connect(&fake);

    wlm.start_measurement().await.unwrap();
    wlm.stop_measurement().await.unwrap();
    let calls = fake.calls();
    assert!(calls.contains(&format!("operation({})", wlm_sys_codes::START_MEASUREMENT)));
    assert!(calls.contains(&format!("operation({})", wlm_sys_codes::STOP_ALL)));

    fake.state.lock().operation_result = -2;
    assert_eq!(
        wlm.start_measurement().await,
        Err(WlmError::CommandFailed {
            command: "cCtrlStartMeasurement",
            code: -2
        })
    );
}

#[tokio::test]
async fn test_operation_state() {
    let fake = FakeWlm::new();
    let wlm = connect(&fake);
    assert_eq!(
        wlm.get_operation_state().await.unwrap(),
        OperationState::Measurement
    );

    fake.state.lock().operation_state = wlm_sys_codes::STOP;
    assert_eq!(wlm.get_operation_state().await.unwrap(), OperationState::Stop);
}

#[tokio::test]
async fn test_auto_exposure() {
    let fake = FakeWlm::with(|s| s.model = 6);
    let wlm = connect(&fake);

    wlm.set_auto_exposure(1, true).await.unwrap();
    assert!(fake.calls().contains(&"set_exposure_mode(1, true)".to_string()));

    assert_eq!(
        wlm.set_auto_exposure(2, true).await,
        Err(WlmError::InvalidChannel { channel: 2, max: 1 })
    );

    fake.state.lock().exposure_result = -1;
    assert!(matches!(
        wlm.set_auto_exposure(1, false).await,
        Err(WlmError::CommandFailed { code: -1, .. })
    ));
}
