//! Shared utilities for RIFT tools.
//!
//! Libraries only emit `tracing` events; binaries call one of these once
//! at startup to install a subscriber.

#![forbid(unsafe_code)]

use tracing_subscriber::EnvFilter;

/// Initialize tracing with sensible defaults.
///
/// Log level is controlled by the `RUST_LOG` environment variable.
/// Defaults to `info` if not set.
pub fn init_tracing() {
    init_tracing_with_default("info");
}

/// Initialize tracing with a specific default level.
///
/// `RUST_LOG`, when set, still takes precedence.
pub fn init_tracing_with_default(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
