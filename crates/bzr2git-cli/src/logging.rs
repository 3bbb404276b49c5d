//! Diagnostic logging to stderr.

use crate::commands::LogLevel;

/// Install the global subscriber. Progress lines go to stdout separately.
pub fn init(level: LogLevel) {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::from(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
