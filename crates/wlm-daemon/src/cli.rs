//! Command-line interface.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::config::ConfigOverrides;

/// HighFinesse wavemeter controller
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "aqctl_highfinesse", version, about, long_about = None)]
pub struct Cli {
    /// Additional IP address to bind to; "*" binds every interface
    #[arg(long = "bind", value_name = "ADDR")]
    pub bind: Vec<String>,

    /// Do not bind to 127.0.0.1 and ::1
    #[arg(long)]
    pub no_localhost_bind: bool,

    /// TCP control port [default: 3260]
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Put the driver in simulation mode
    #[arg(long)]
    pub simulation: bool,

    /// Path of the wavemeter library (wlmData)
    #[arg(short, long, value_name = "PATH")]
    pub device: Option<PathBuf>,

    /// Increase logging verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Decrease logging verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    pub quiet: u8,

    /// Optional TOML configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Flags that were actually given, as the top configuration layer.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            bind: (!self.bind.is_empty()).then(|| self.bind.clone()),
            no_localhost_bind: self.no_localhost_bind.then_some(true),
            port: self.port,
            simulation: self.simulation.then_some(true),
            device: self.device.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "aqctl_highfinesse",
            "--bind",
            "10.0.0.5",
            "--bind",
            "*",
            "-p",
            "3261",
            "-d",
            "/opt/wlm/libwlmData.so",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.bind, vec!["10.0.0.5", "*"]);
        assert_eq!(cli.port, Some(3261));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.quiet, 0);
        assert!(!cli.simulation);
    }

    #[test]
    fn test_overrides_only_carry_given_flags() {
        let cli = Cli::try_parse_from(["aqctl_highfinesse", "--simulation"]).unwrap();
        assert_eq!(
            cli.overrides(),
            ConfigOverrides {
                simulation: Some(true),
                ..Default::default()
            }
        );
    }
}
