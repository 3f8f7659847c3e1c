//! Logging setup for the probe binary.

use anyhow::Context;

/// Initializes structured logging based on verbosity level.
///
/// `verbose` raises the level (0=INFO, 1=DEBUG, 2+=TRACE); `quiet` caps
/// output at ERROR regardless of `verbose`. Logs go to stderr so probe
/// results on stdout stay machine-readable.
pub fn init_logging(verbose: u8, quiet: bool) -> anyhow::Result<()> {
    let level = match (quiet, verbose) {
        (true, _) => tracing::Level::ERROR,
        (false, 0) => tracing::Level::INFO,
        (false, 1) => tracing::Level::DEBUG,
        (false, _) => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to initialize logging")?;

    Ok(())
}
