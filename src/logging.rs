//! Tracing subscriber initialisation.
//!
//! Only the binary installs a subscriber; the library just emits events
//! through its [`Reporter`](rcog::report::Reporter).
//!
//! # Verbosity mapping
//!
//! | Flag(s)   | Filter level |
//! |-----------|--------------|
//! | `--quiet` | OFF          |
//! | (none)    | INFO         |
//! | `-v`      | DEBUG        |
//! | `-vv`     | TRACE        |
//!
//! `RUST_LOG` overrides all of the above if set.

use std::io::IsTerminal as _;

use rcog::report::Verbosity;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialise the global tracing subscriber, writing to stderr.
///
/// Must be called once, before any events fire.
pub fn init_logging(verbosity: Verbosity, verbose: u8) -> anyhow::Result<()> {
    let level = derive_level(verbosity, verbose);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rcog={level}")));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .without_time()
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise tracing: {e}"))?;

    Ok(())
}

fn derive_level(verbosity: Verbosity, verbose: u8) -> &'static str {
    match verbosity {
        Verbosity::Quiet => "off",
        Verbosity::Normal => "info",
        Verbosity::Verbose if verbose > 1 => "trace",
        Verbosity::Verbose => "debug",
    }
}
