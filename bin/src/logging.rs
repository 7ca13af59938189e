//! Diagnostic logging setup.
//!
//! Logs go to stderr only; stdout carries nothing but matching lines.

use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global subscriber.
///
/// With `-d` flags the level is taken from their count, otherwise from
/// `RUST_LOG`, falling back to `warn`.
pub(crate) fn init(verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        level => EnvFilter::new(level_for(level)),
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

const fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
