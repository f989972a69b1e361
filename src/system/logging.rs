//! Logging system initialization.
//!
//! Call once during startup, after configuration has been loaded.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Initialize the tracing subscriber from configuration.
///
/// # Panics
/// * If the global subscriber is already set.
pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::new(config.level.clone());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_level(true);

    if config.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}
