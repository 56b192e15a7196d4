//! Objects the server exposes to clients.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Result, RpcError};

/// Description of one callable method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MethodInfo {
    /// Method name as sent by clients
    pub name: &'static str,
    /// Parameter names, in positional order
    pub args: &'static [&'static str],
    /// One-line description
    pub doc: &'static str,
}

/// A device (or anything else) served over RPC.
///
/// The server holds each target behind an async mutex, so `call` runs with
/// exclusive access and requests from all clients are serialized.
#[async_trait]
pub trait RpcTarget: Send {
    /// Methods clients may call.
    fn methods(&self) -> &'static [MethodInfo];

    /// Dispatch one call. `method` is always one of [`RpcTarget::methods`].
    async fn call(&mut self, method: &str, args: Args) -> Result<Value>;

    /// Release resources once the server has stopped.
    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Arguments of one call, addressable by position or keyword.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    method: String,
    positional: Vec<Value>,
    keyword: Map<String, Value>,
}

impl Args {
    /// Arguments for a call to `method`.
    pub fn new(method: impl Into<String>, positional: Vec<Value>, keyword: Map<String, Value>) -> Self {
        Self {
            method: method.into(),
            positional,
            keyword,
        }
    }

    fn lookup(&self, index: usize, name: &str) -> Result<Option<&Value>> {
        match (self.positional.get(index), self.keyword.get(name)) {
            (Some(_), Some(_)) => Err(RpcError::bad_arguments(
                &self.method,
                format!("argument '{}' given by position and keyword", name),
            )),
            (Some(value), None) | (None, Some(value)) => Ok(Some(value)),
            (None, None) => Ok(None),
        }
    }

    fn decode<T: DeserializeOwned>(&self, name: &str, value: &Value) -> Result<T> {
        serde_json::from_value(value.clone()).map_err(|e| {
            RpcError::bad_arguments(&self.method, format!("argument '{}': {}", name, e))
        })
    }

    /// Required argument at `index` or keyword `name`.
    pub fn get<T: DeserializeOwned>(&self, index: usize, name: &str) -> Result<T> {
        match self.lookup(index, name)? {
            Some(value) => self.decode(name, value),
            None => Err(RpcError::bad_arguments(
                &self.method,
                format!("missing argument '{}'", name),
            )),
        }
    }

    /// Optional argument with a default.
    pub fn get_or<T: DeserializeOwned>(&self, index: usize, name: &str, default: T) -> Result<T> {
        match self.lookup(index, name)? {
            Some(value) => self.decode(name, value),
            None => Ok(default),
        }
    }

    /// Reject arguments beyond the `names` the method accepts.
    pub fn check(&self, names: &[&str]) -> Result<()> {
        if self.positional.len() > names.len() {
            return Err(RpcError::bad_arguments(
                &self.method,
                format!(
                    "takes {} positional arguments but {} were given",
                    names.len(),
                    self.positional.len()
                ),
            ));
        }
        if let Some(extra) = self.keyword.keys().find(|k| !names.contains(&k.as_str())) {
            return Err(RpcError::bad_arguments(
                &self.method,
                format!("unexpected keyword argument '{}'", extra),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(positional: Value, keyword: Value) -> Args {
        let positional = positional.as_array().cloned().unwrap_or_default();
        let keyword = keyword.as_object().cloned().unwrap_or_default();
        Args::new("set_auto_exposure", positional, keyword)
    }

    #[test]
    fn test_positional_and_keyword() {
        let a = args(json!([2]), json!({"enabled": false}));
        assert_eq!(a.get::<u32>(0, "channel").unwrap(), 2);
        assert!(!a.get::<bool>(1, "enabled").unwrap());
    }

    #[test]
    fn test_missing_and_default() {
        let a = args(json!([]), json!({}));
        assert!(matches!(
            a.get::<u32>(0, "channel"),
            Err(RpcError::BadArguments { .. })
        ));
        assert_eq!(a.get_or(0, "channel", 1u32).unwrap(), 1);
    }

    #[test]
    fn test_wrong_type() {
        let a = args(json!(["one"]), json!({}));
        let err = a.get::<u32>(0, "channel").unwrap_err();
        assert!(err.to_string().contains("argument 'channel'"));
    }

    #[test]
    fn test_duplicate_argument() {
        let a = args(json!([1]), json!({"channel": 2}));
        assert!(a.get::<u32>(0, "channel").is_err());
    }

    #[test]
    fn test_check_surplus() {
        let a = args(json!([1, true, 3]), json!({}));
        assert!(a.check(&["channel", "enabled"]).is_err());

        let a = args(json!([]), json!({"chanel": 1}));
        let err = a.check(&["channel"]).unwrap_err();
        assert!(err.to_string().contains("unexpected keyword argument 'chanel'"));

        let a = args(json!([1]), json!({"enabled": true}));
        assert!(a.check(&["channel", "enabled"]).is_ok());
    }
}
