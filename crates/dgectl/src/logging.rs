//! Logging for dgectl
//!
//! Diagnostics go to stderr so command output stays clean. The filter comes
//! from `RUST_LOG`, else `logging.level` in the config, else `warn`.

use tracing_subscriber::EnvFilter;

/// Build the filter from `RUST_LOG` or the configured level
pub fn filter(config_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

pub fn init(config_level: &str) {
    // Already initialized is fine
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(config_level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
