//! `aqctl_highfinesse`: serve a HighFinesse wavemeter over the network.
//!
//! ```bash
//! aqctl_highfinesse --simulation -v
//! aqctl_highfinesse -d /opt/HighFinesse/libwlmData.so --bind '*' -p 3260
//! ```

// Global allocator (Microsoft Rust Guidelines: M-MIMALLOC-APPS)
#[cfg(not(test))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use daq_driver_highfinesse::HighFinesse;
use daq_rpc::{bind_all, RpcServer};
use tokio::signal;
use tracing::{error, info, warn};
use wlm_daemon::{init_logging, Cli, ConfigError, DaemonConfig, WavemeterTarget, TARGET_NAME};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet)?;

    let config = DaemonConfig::load(cli.config.as_deref(), &cli.overrides())?;
    match config.validate() {
        Ok(()) => {}
        Err(ConfigError::MissingDevice) => {
            eprintln!("{}", ConfigError::MissingDevice);
            Cli::command().print_help()?;
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    }

    let addrs = config.bind_addresses()?;
    let mut wlm = HighFinesse::new(config.simulation, config.device.as_deref())
        .inspect_err(|e| {
            if e.is_startup() {
                error!(kind = e.kind(), "Wavemeter startup failed");
            }
        })
        .context("Failed to connect to wavemeter")?;
    wlm.init().await.context("Failed to initialise wavemeter")?;
    info!(id = %wlm.id().await, "Wavemeter ready");

    let server = RpcServer::builder()
        .target(TARGET_NAME, WavemeterTarget::new(wlm))
        .description("HighFinesse wavemeter controller")
        .builtin_terminate(true)
        .build();

    let listeners = bind_all(&addrs).await.context("Failed to start RPC server")?;

    let stopper = server.clone();
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                info!("Interrupt received");
                stopper.shutdown();
            }
            Err(e) => warn!(error = %e, "Cannot listen for Ctrl-C"),
        }
    });

    server.run(listeners).await?;
    server
        .close_targets()
        .await
        .context("Failed to close wavemeter")?;

    info!("Stopped");
    Ok(())
}
