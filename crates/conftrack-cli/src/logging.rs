//! Tracing setup for the binary

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "CONFTRACK_LOG";

/// Install the fmt subscriber
///
/// Respects `CONFTRACK_LOG` (an `EnvFilter` directive); defaults to `info`.
/// A second call is a no-op.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    // Err only when a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
