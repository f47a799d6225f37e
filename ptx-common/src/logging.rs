//! Tracing initialization shared by the PTX binaries

use crate::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Build the env filter for a module
///
/// `RUST_LOG` wins when set; otherwise the configured level applies.
pub fn env_filter(logging: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level))
}

/// Install the global fmt subscriber
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing(logging: &LoggingConfig) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(logging))
        .try_init();
}
