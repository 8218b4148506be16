//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    env_logger::init();
}

/// Initialize the logging system with a fallback filter
///
/// `RUST_LOG` still wins when it is set; `level` is only used when the
/// environment does not specify a filter.
pub fn init_with_level(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}
