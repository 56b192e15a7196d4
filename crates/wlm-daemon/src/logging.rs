//! Logging setup.

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Default level from the `-v`/`-q` counts, starting at WARN.
pub fn level_filter(verbose: u8, quiet: u8) -> LevelFilter {
    const LEVELS: [LevelFilter; 6] = [
        LevelFilter::OFF,
        LevelFilter::ERROR,
        LevelFilter::WARN,
        LevelFilter::INFO,
        LevelFilter::DEBUG,
        LevelFilter::TRACE,
    ];
    let index = (2 + i32::from(verbose) - i32::from(quiet)).clamp(0, 5);
    LEVELS[index as usize]
}

/// Install the global fmt subscriber. `RUST_LOG`, when set, wins.
pub fn init_logging(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(level_filter(verbose, quiet).into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise logging: {}", e))
}
