//! Network controller for HighFinesse wavemeters.
//!
//! Wires the `daq-driver-highfinesse` adapter to the `daq-rpc` server and
//! provides the command line, configuration layering and logging setup used
//! by the `aqctl_highfinesse` binary.

pub mod cli;
pub mod config;
pub mod logging;
pub mod target;

pub use cli::Cli;
pub use config::{ConfigError, ConfigOverrides, DaemonConfig, DEFAULT_PORT};
pub use logging::{init_logging, level_filter};
pub use target::{WavemeterTarget, TARGET_NAME};
