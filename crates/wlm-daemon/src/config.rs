//! Daemon configuration.
//!
//! Layered with figment, lowest priority first:
//!
//! 1. built-in defaults
//! 2. optional TOML file (`--config`)
//! 3. `WLM_`-prefixed environment variables (`WLM_PORT=3261`,
//!    `WLM_DEVICE=/opt/wlm/libwlmData.so`, `WLM_SIMULATION=true`,
//!    `WLM_BIND='["10.0.0.5"]'`)
//! 4. command-line flags

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Default TCP control port.
pub const DEFAULT_PORT: u16 = 3260;

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "WLM_";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File or environment could not be merged or deserialized
    #[error("Failed to load configuration: {0}")]
    Figment(#[from] Box<figment::Error>),

    /// Neither simulation nor a device was selected
    #[error("No device selected: pass --device or --simulation")]
    MissingDevice,

    /// A bind entry is not an IP address
    #[error("Invalid bind address '{0}'")]
    InvalidBind(String),
}

/// Resolved daemon settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    /// Extra addresses to listen on; `*` means every interface
    pub bind: Vec<String>,
    /// Skip the implicit 127.0.0.1 and ::1 listeners
    pub no_localhost_bind: bool,
    /// TCP control port
    pub port: u16,
    /// Fabricate readings instead of loading the vendor library
    pub simulation: bool,
    /// Path of the vendor library
    pub device: Option<PathBuf>,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            bind: Vec::new(),
            no_localhost_bind: false,
            port: DEFAULT_PORT,
            simulation: false,
            device: None,
        }
    }
}

/// Values given on the command line; unset fields leave lower layers alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfigOverrides {
    /// Extra listen addresses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bind: Option<Vec<String>>,
    /// Skip localhost listeners
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_localhost_bind: Option<bool>,
    /// TCP control port
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Simulation mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simulation: Option<bool>,
    /// Vendor library path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<PathBuf>,
}

impl DaemonConfig {
    /// Build the layered figment without extracting it.
    pub fn figment(config_path: Option<&Path>, overrides: &ConfigOverrides) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(DaemonConfig::default()));

        if let Some(path) = config_path {
            if path.exists() {
                debug!(path = %path.display(), "Loading config file");
                figment = figment.merge(Toml::file(path));
            } else {
                warn!(path = %path.display(), "Config file not found, using defaults");
            }
        }

        figment
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Serialized::defaults(overrides))
    }

    /// Load and merge every layer.
    ///
    /// Does not validate; call [`DaemonConfig::validate`] before use.
    pub fn load(
        config_path: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        Self::figment(config_path, overrides)
            .extract()
            .map_err(|e| ConfigError::Figment(Box::new(e)))
    }

    /// Check the settings are usable.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingDevice`] when not simulating and no device is
    /// set; [`ConfigError::InvalidBind`] for an unparseable bind entry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.simulation && self.device.is_none() {
            return Err(ConfigError::MissingDevice);
        }
        self.bind_addresses().map(|_| ())
    }

    /// Socket addresses to listen on.
    pub fn bind_addresses(&self) -> Result<Vec<SocketAddr>, ConfigError> {
        let mut ips: Vec<IpAddr> = Vec::new();
        if !self.no_localhost_bind {
            ips.push(IpAddr::V4(Ipv4Addr::LOCALHOST));
            ips.push(IpAddr::V6(Ipv6Addr::LOCALHOST));
        }

        for entry in &self.bind {
            if entry == "*" {
                ips.push(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
                ips.push(IpAddr::V6(Ipv6Addr::UNSPECIFIED));
            } else {
                let ip = entry
                    .parse()
                    .map_err(|_| ConfigError::InvalidBind(entry.clone()))?;
                ips.push(ip);
            }
        }

        let mut addrs: Vec<SocketAddr> = Vec::with_capacity(ips.len());
        for ip in ips {
            let addr = SocketAddr::new(ip, self.port);
            if !addrs.contains(&addr) {
                addrs.push(addr);
            }
        }
        Ok(addrs)
    }
}
