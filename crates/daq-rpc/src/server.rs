//! TCP server loop.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use tokio::net::TcpListener;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::error::{Result, RpcError};
use crate::protocol::{Reply, Request, RpcId, INIT_LINE};
use crate::target::{Args, RpcTarget};

/// Pause after a failed `accept` (e.g. out of file descriptors).
const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

type SharedTarget = Arc<Mutex<Box<dyn RpcTarget>>>;

struct ServerInner {
    targets: BTreeMap<String, SharedTarget>,
    description: Option<String>,
    builtin_terminate: bool,
    shutdown: watch::Sender<bool>,
}

/// Serves one or more [`RpcTarget`]s to line-JSON clients.
///
/// Cheap to clone; clones share targets and the shutdown signal.
#[derive(Clone)]
pub struct RpcServer {
    inner: Arc<ServerInner>,
}

/// Builder for [`RpcServer`].
#[derive(Default)]
pub struct RpcServerBuilder {
    targets: BTreeMap<String, SharedTarget>,
    description: Option<String>,
    builtin_terminate: bool,
}

impl RpcServerBuilder {
    /// Expose `target` under `name`.
    pub fn target(mut self, name: impl Into<String>, target: impl RpcTarget + 'static) -> Self {
        let target: Box<dyn RpcTarget> = Box::new(target);
        self.targets.insert(name.into(), Arc::new(Mutex::new(target)));
        self
    }

    /// Free-form description returned by `get_rpc_id`.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Accept the `terminate` action, which stops the server.
    pub fn builtin_terminate(mut self, enabled: bool) -> Self {
        self.builtin_terminate = enabled;
        self
    }

    /// Finish building.
    pub fn build(self) -> RpcServer {
        let (shutdown, _) = watch::channel(false);
        RpcServer {
            inner: Arc::new(ServerInner {
                targets: self.targets,
                description: self.description,
                builtin_terminate: self.builtin_terminate,
                shutdown,
            }),
        }
    }
}

/// Bind every address, warning about those that fail.
///
/// # Errors
///
/// [`RpcError::NoListeners`] if no address could be bound.
pub async fn bind_all(addrs: &[SocketAddr]) -> Result<Vec<TcpListener>> {
    let mut listeners = Vec::with_capacity(addrs.len());
    for addr in addrs {
        match TcpListener::bind(addr).await {
            Ok(listener) => {
                info!(%addr, "RPC server listening");
                listeners.push(listener);
            }
            Err(e) => warn!(%addr, error = %e, "Failed to bind RPC listener"),
        }
    }

    if listeners.is_empty() {
        return Err(RpcError::NoListeners);
    }
    Ok(listeners)
}

impl RpcServer {
    /// Start building a server.
    pub fn builder() -> RpcServerBuilder {
        RpcServerBuilder::default()
    }

    fn rpc_id(&self) -> RpcId {
        RpcId {
            targets: self.inner.targets.keys().cloned().collect(),
            description: self.inner.description.clone(),
        }
    }

    /// Ask the accept loops and open connections to stop.
    pub fn shutdown(&self) {
        info!("RPC server shutting down");
        self.inner.shutdown.send_replace(true);
    }

    /// True once [`RpcServer::shutdown`] has been called.
    pub fn is_shut_down(&self) -> bool {
        *self.inner.shutdown.borrow()
    }

    /// Close every target, in name order. Call after [`RpcServer::run`].
    pub async fn close_targets(&self) -> Result<()> {
        for (name, target) in &self.inner.targets {
            debug!(target = %name, "Closing RPC target");
            target.lock().await.close().await?;
        }
        Ok(())
    }

    /// Accept clients on every listener until shut down.
    pub async fn run(&self, listeners: Vec<TcpListener>) -> Result<()> {
        let mut tasks = JoinSet::new();
        for listener in listeners {
            let server = self.clone();
            tasks.spawn(async move { server.accept_loop(listener).await });
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "RPC accept loop panicked");
            }
        }
        Ok(())
    }

    async fn accept_loop(&self, listener: TcpListener) {
        let mut shutdown = self.inner.shutdown.subscribe();
        loop {
            if *shutdown.borrow_and_update() {
                break;
            }
            tokio::select! {
                result = listener.accept() => match result {
                    Ok((stream, peer)) => {
                        let server = self.clone();
                        tokio::spawn(async move {
                            if let Err(e) = server.handle_connection(stream, &peer.to_string()).await {
                                warn!(%peer, error = %e, "RPC client error");
                            }
                        });
                    }
                    Err(e) => {
                        error!(error = %e, "RPC accept error");
                        accept_backoff(&mut shutdown).await;
                    }
                },
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
    }

    /// Serve one client connection until it closes or the server stops.
    pub async fn handle_connection<S>(&self, stream: S, peer: &str) -> Result<()>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let (reader, mut writer) = tokio::io::split(stream);
        let mut lines = BufReader::new(reader).lines();
        let mut shutdown = self.inner.shutdown.subscribe();

        let Some(init) = next_line(&mut lines, &mut shutdown).await? else {
            return Ok(());
        };
        if init != INIT_LINE {
            warn!(peer, "RPC client sent an invalid handshake");
            return Ok(());
        }
        write_json(&mut writer, &self.rpc_id()).await?;

        let Some(name) = next_line(&mut lines, &mut shutdown).await? else {
            return Ok(());
        };
        let Some(target) = self.inner.targets.get(&name).cloned() else {
            warn!(peer, target = %name, "RPC client selected an unknown target");
            return Ok(());
        };
        let names: Vec<&str> = target.lock().await.methods().iter().map(|m| m.name).collect();
        write_json(&mut writer, &names).await?;
        info!(peer, target = %name, "RPC client connected");

        while let Some(line) = next_line(&mut lines, &mut shutdown).await? {
            if line.trim().is_empty() {
                continue;
            }
            let (reply, terminate) = self.process_line(&target, &line).await;
            write_json(&mut writer, &reply).await?;
            if terminate {
                break;
            }
        }

        info!(peer, "RPC client disconnected");
        Ok(())
    }

    async fn process_line(&self, target: &SharedTarget, line: &str) -> (Reply, bool) {
        let request: Request = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                let err = RpcError::MalformedRequest(e.to_string());
                warn!(error = %err, "Rejected RPC request");
                return (Reply::failed(&err), false);
            }
        };

        match request {
            Request::Call { name, args, kwargs } => {
                let mut target = target.lock().await;
                if !target.methods().iter().any(|m| m.name == name) {
                    return (Reply::failed(&RpcError::UnknownMethod { name }), false);
                }

                debug!(method = %name, "RPC call");
                let args = Args::new(name.as_str(), args, kwargs);
                match target.call(&name, args).await {
                    Ok(ret) => (Reply::ok(ret), false),
                    Err(e) => {
                        warn!(method = %name, error = %e, "RPC call failed");
                        (Reply::failed(&e), false)
                    }
                }
            }
            Request::GetRpcMethodList => {
                let methods = target.lock().await.methods();
                (Reply::ok(json!(methods)), false)
            }
            Request::GetRpcId => (Reply::ok(json!(self.rpc_id())), false),
            Request::Terminate if self.inner.builtin_terminate => {
                self.shutdown();
                (Reply::ok(Value::Null), true)
            }
            Request::Terminate => (
                Reply::failed(&RpcError::UnknownMethod {
                    name: "terminate".into(),
                }),
                false,
            ),
        }
    }
}

/// Wait [`ACCEPT_RETRY_DELAY`] before the next `accept`, or less if the
/// server is shutting down.
async fn accept_backoff(shutdown: &mut watch::Receiver<bool>) {
    tokio::select! {
        _ = tokio::time::sleep(ACCEPT_RETRY_DELAY) => {}
        _ = shutdown.changed() => {}
    }
}

async fn next_line<R>(lines: &mut Lines<R>, shutdown: &mut watch::Receiver<bool>) -> Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    if *shutdown.borrow_and_update() {
        return Ok(None);
    }
    tokio::select! {
        line = lines.next_line() => Ok(line?),
        _ = shutdown.changed() => Ok(None),
    }
}

async fn write_json<W, T>(writer: &mut W, value: &T) -> Result<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize + ?Sized,
{
    let mut line = serde_json::to_vec(value)?;
    line.push(b'\n');
    writer.write_all(&line).await?;
    writer.flush().await?;
    Ok(())
}
