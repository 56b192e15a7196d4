//! Line-delimited JSON RPC server.
//!
//! Reflects the methods of an [`RpcTarget`] over TCP using the `pc_rpc`
//! handshake lab control systems already speak. Each connection selects one
//! target by name and then sends one JSON request per line.
//!
//! ```no_run
//! use daq_rpc::{bind_all, RpcServer};
//! # use daq_rpc::{Args, MethodInfo, RpcTarget};
//! # use async_trait::async_trait;
//! # struct Device;
//! # #[async_trait]
//! # impl RpcTarget for Device {
//! #     fn methods(&self) -> &'static [MethodInfo] { &[] }
//! #     async fn call(&mut self, _: &str, _: Args) -> daq_rpc::Result<serde_json::Value> {
//! #         Ok(serde_json::Value::Null)
//! #     }
//! # }
//!
//! # async fn example() -> daq_rpc::Result<()> {
//! let server = RpcServer::builder().target("Device", Device).build();
//! let listeners = bind_all(&["127.0.0.1:3260".parse().unwrap()]).await?;
//! server.run(listeners).await
//! # }
//! ```

pub mod error;
pub mod protocol;
pub mod server;
pub mod target;

pub use error::{Result, RpcError};
pub use protocol::{ExceptionInfo, Reply, Request, RpcId, INIT_LINE};
pub use server::{bind_all, RpcServer, RpcServerBuilder};
pub use target::{Args, MethodInfo, RpcTarget};
