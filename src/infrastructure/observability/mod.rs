//! Logging setup shared by every binary.
//!
//! Runs log to stdout through `tracing` at `info`. A valid `RUST_LOG`
//! replaces that default entirely.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

const DEFAULT_DIRECTIVES: &str = "info";

/// Installs the global subscriber. Call once, first thing in `main`.
pub fn init_tracing() {
    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);

    // try_init: a second call (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(env_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with(stdout_layer)
        .try_init();
}

/// Filter for the given `RUST_LOG` value, falling back to `info` when it is
/// unset or unparsable.
fn env_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
}
