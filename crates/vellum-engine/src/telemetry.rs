//! Log subscriber setup for binaries embedding the engine.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs a global fmt subscriber filtered by `RUST_LOG`, falling back to
/// `default_directive` (for example `"info"` or `"vellum_engine=debug"`).
///
/// Returns false when a global subscriber was already installed.
pub fn init_tracing(default_directive: &str) -> bool {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive)))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}

/// Directive matching the engine's `debug` setting.
pub fn default_directive(debug: bool) -> &'static str {
    if debug { "debug" } else { "info" }
}
