//! Log setup for the CLI.
//!
//! Logs go to stderr through a `tracing-subscriber` fmt layer so stdout
//! stays parseable. `RUST_LOG` selects what is shown; without it only
//! warnings are printed, or debug output with `--verbose`.

use anyhow::{anyhow, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "geomoves=debug,geomoves_core=debug"
    } else {
        "warn"
    }
}

pub fn init(verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .with(filter)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {}", e))
}
