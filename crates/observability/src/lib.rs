//! Tracing and logging setup shared by every binary entry point.

pub mod logging;

pub use logging::{LogFormat, LoggingConfig};

/// Initialize process-wide logging from `config`.
///
/// Safe to call multiple times; only the first call installs a subscriber.
/// Returns whether this call installed it.
pub fn init(config: &LoggingConfig) -> bool {
    logging::init(config)
}
