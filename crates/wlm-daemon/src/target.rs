//! The wavemeter as an RPC target.

use async_trait::async_trait;
use daq_driver_highfinesse::{HighFinesse, WlmError};
use daq_rpc::{Args, MethodInfo, RpcError, RpcTarget};
use serde_json::{json, Value};

/// Name clients select after the handshake.
pub const TARGET_NAME: &str = "HighFinesse";

const METHODS: &[MethodInfo] = &[
    MethodInfo {
        name: "id",
        args: &[],
        doc: "Instrument identification string.",
    },
    MethodInfo {
        name: "get_status",
        args: &[],
        doc: "Reserved status hook; returns null.",
    },
    MethodInfo {
        name: "ping",
        args: &[],
        doc: "True if the wavemeter is reachable.",
    },
    MethodInfo {
        name: "get_temperature",
        args: &[],
        doc: "Housing temperature in degrees C.",
    },
    MethodInfo {
        name: "get_pressure",
        args: &[],
        doc: "Internal pressure in mBar.",
    },
    MethodInfo {
        name: "get_frequency",
        args: &["ch"],
        doc: "[status, frequency in Hz] for a 1-based channel.",
    },
    MethodInfo {
        name: "channel_count",
        args: &[],
        doc: "Number of detector channels.",
    },
    MethodInfo {
        name: "get_operation_state",
        args: &[],
        doc: "Measurement loop state: 0 stop, 1 adjustment, 2 measurement.",
    },
    MethodInfo {
        name: "start_measurement",
        args: &[],
        doc: "Start the measurement loop.",
    },
    MethodInfo {
        name: "stop_measurement",
        args: &[],
        doc: "Stop all wavemeter activity.",
    },
    MethodInfo {
        name: "set_auto_exposure",
        args: &["channel", "enabled"],
        doc: "Switch automatic exposure for a 1-based channel.",
    },
];

fn to_rpc(err: WlmError) -> RpcError {
    RpcError::target(err.kind(), err)
}

/// Serves a [`HighFinesse`] session.
#[derive(Debug)]
pub struct WavemeterTarget {
    wlm: HighFinesse,
}

impl WavemeterTarget {
    /// Wrap a connected session.
    pub fn new(wlm: HighFinesse) -> Self {
        Self { wlm }
    }
}

#[async_trait]
impl RpcTarget for WavemeterTarget {
    fn methods(&self) -> &'static [MethodInfo] {
        METHODS
    }

    async fn call(&mut self, method: &str, args: Args) -> daq_rpc::Result<Value> {
        let accepted = METHODS
            .iter()
            .find(|m| m.name == method)
            .map(|m| m.args)
            .unwrap_or(&[]);
        args.check(accepted)?;

        let wlm = &self.wlm;
        match method {
            "id" => Ok(json!(wlm.id().await)),
            "get_status" => {
                wlm.get_status().await.map_err(to_rpc)?;
                Ok(Value::Null)
            }
            "ping" => Ok(json!(wlm.ping().await.map_err(to_rpc)?)),
            "get_temperature" => Ok(json!(wlm.get_temperature().await.map_err(to_rpc)?)),
            "get_pressure" => Ok(json!(wlm.get_pressure().await.map_err(to_rpc)?)),
            "get_frequency" => {
                let channel: u32 = args.get(0, "ch")?;
                Ok(serde_json::to_value(wlm.get_frequency(channel).await)?)
            }
            "channel_count" => Ok(json!(wlm.channel_count())),
            "get_operation_state" => {
                let state = wlm.get_operation_state().await.map_err(to_rpc)?;
                Ok(json!(state.code()))
            }
            "start_measurement" => {
                wlm.start_measurement().await.map_err(to_rpc)?;
                Ok(Value::Null)
            }
            "stop_measurement" => {
                wlm.stop_measurement().await.map_err(to_rpc)?;
                Ok(Value::Null)
            }
            "set_auto_exposure" => {
                let channel: u32 = args.get(0, "channel")?;
                let enabled: bool = args.get(1, "enabled")?;
                wlm.set_auto_exposure(channel, enabled)
                    .await
                    .map_err(to_rpc)?;
                Ok(Value::Null)
            }
            other => Err(RpcError::UnknownMethod { name: other.into() }),
        }
    }

    async fn close(&mut self) -> daq_rpc::Result<()> {
        self.wlm.close().await.map_err(to_rpc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn call_args(method: &str, positional: Vec<Value>) -> Args {
        Args::new(method, positional, Map::new())
    }

    #[tokio::test]
    async fn test_simulated_calls() {
        let mut target = WavemeterTarget::new(HighFinesse::simulated());

        let id = target.call("id", call_args("id", vec![])).await.unwrap();
        assert_eq!(id, json!("WLM simulator"));

        let reading = target
            .call("get_frequency", call_args("get_frequency", vec![json!(1)]))
            .await
            .unwrap();
        assert_eq!(reading, json!([0, 123456789000000.0]));

        let temperature = target
            .call("get_temperature", call_args("get_temperature", vec![]))
            .await
            .unwrap();
        assert_eq!(temperature, json!(25.0));

        let state = target
            .call("get_operation_state", call_args("get_operation_state", vec![]))
            .await
            .unwrap();
        assert_eq!(state, json!(2));

        for method in ["start_measurement", "stop_measurement"] {
            let ret = target.call(method, call_args(method, vec![])).await.unwrap();
            assert_eq!(ret, Value::Null, "{}", method);
        }
    }

    #[tokio::test]
    async fn test_frequency_channel_is_required() {
        let mut target = WavemeterTarget::new(HighFinesse::simulated());

        let mut kwargs = Map::new();
        kwargs.insert("ch".into(), json!(2));
        let reading = target
            .call("get_frequency", Args::new("get_frequency", vec![], kwargs))
            .await
            .unwrap();
        assert_eq!(reading, json!([0, 123456789000000.0]));

        let err = target
            .call("get_frequency", call_args("get_frequency", vec![]))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "BadArguments");
        assert!(err.to_string().contains("missing argument 'ch'"));
    }

    #[tokio::test]
    async fn test_argument_errors() {
        let mut target = WavemeterTarget::new(HighFinesse::simulated());

        let err = target
            .call("id", call_args("id", vec![json!(1)]))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "BadArguments");

        let err = target
            .call(
                "set_auto_exposure",
                call_args("set_auto_exposure", vec![json!(1)]),
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("missing argument 'enabled'"));
    }

    #[tokio::test]
    async fn test_driver_errors_keep_kind() {
        let mut target = WavemeterTarget::new(HighFinesse::simulated());
        let err = target
            .call(
                "set_auto_exposure",
                call_args("set_auto_exposure", vec![json!(5), json!(true)]),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "InvalidChannel");
    }

    #[test]
    fn test_every_method_is_listed_once() {
        let mut names: Vec<&str> = METHODS.iter().map(|m| m.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), METHODS.len());
    }
}
