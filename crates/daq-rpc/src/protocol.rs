//! Wire format.
//!
//! One JSON document per line in both directions. A session starts with the
//! client sending [`INIT_LINE`], the server answering with an [`RpcId`], the
//! client naming a target and the server answering with that target's method
//! names. After that every line is a [`Request`] answered by one [`Reply`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::RpcError;

/// First line a client must send.
pub const INIT_LINE: &str = "ARTIQ pc_rpc";

/// A client request.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Request {
    /// Invoke a target method
    Call {
        /// Method name
        name: String,
        /// Positional arguments
        #[serde(default)]
        args: Vec<Value>,
        /// Keyword arguments
        #[serde(default)]
        kwargs: Map<String, Value>,
    },
    /// Describe the target's methods
    GetRpcMethodList,
    /// Server identification
    GetRpcId,
    /// Stop the server (if enabled)
    Terminate,
}

/// Server identification sent after [`INIT_LINE`] and on `get_rpc_id`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RpcId {
    /// Target names a client may select
    pub targets: Vec<String>,
    /// Free-form server description
    pub description: Option<String>,
}

/// Exception details of a failed reply.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ExceptionInfo {
    /// Error kind
    #[serde(rename = "type")]
    pub kind: String,
    /// Human-readable message
    pub message: String,
}

/// Answer to one [`Request`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Reply {
    /// Success with return value
    Ok { ret: Value },
    /// Failure
    Failed { exception: ExceptionInfo },
}

impl Reply {
    /// Successful reply.
    pub fn ok(ret: Value) -> Self {
        Self::Ok { ret }
    }

    /// Failed reply describing `err`.
    pub fn failed(err: &RpcError) -> Self {
        Self::Failed {
            exception: ExceptionInfo {
                kind: err.kind().to_string(),
                message: err.to_string(),
            },
        }
    }

    /// True for [`Reply::Ok`].
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_call() {
        let req: Request =
            serde_json::from_str(r#"{"action": "call", "name": "get_frequency", "args": [1]}"#)
                .unwrap();
        assert_eq!(
            req,
            Request::Call {
                name: "get_frequency".into(),
                args: vec![json!(1)],
                kwargs: Map::new(),
            }
        );
    }

    #[test]
    fn test_parse_actions() {
        let req: Request = serde_json::from_str(r#"{"action": "get_rpc_method_list"}"#).unwrap();
        assert_eq!(req, Request::GetRpcMethodList);
        let req: Request = serde_json::from_str(r#"{"action": "terminate"}"#).unwrap();
        assert_eq!(req, Request::Terminate);
        assert!(serde_json::from_str::<Request>(r#"{"action": "reboot"}"#).is_err());
    }

    #[test]
    fn test_reply_encoding() {
        assert_eq!(
            serde_json::to_value(Reply::ok(json!(25.0))).unwrap(),
            json!({"status": "ok", "ret": 25.0})
        );

        let err = RpcError::UnknownMethod { name: "x".into() };
        assert_eq!(
            serde_json::to_value(Reply::failed(&err)).unwrap(),
            json!({
                "status": "failed",
                "exception": {"type": "UnknownMethod", "message": "Unknown method 'x'"}
            })
        );
    }
}
