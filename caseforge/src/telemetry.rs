//! Tracing initialization (fmt subscriber with env-filter).
//!
//! Log verbosity is controlled via the standard `RUST_LOG` environment
//! variable, defaulting to `info` when unset.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize the tracing subscriber for console output.
///
/// Uses `try_init` so that tests (which may initialize their own subscriber
/// via `test-log`) don't panic on double initialization.
pub fn init_telemetry() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
