//! Logging initialization and utilities

/// Initialize the logging system
///
/// Uses env_logger with default filter level of `info`.
/// Override with RUST_LOG environment variable.
///
/// # Example
/// ```
/// tkscene::core::logging::init();
/// log::info!("Export started");
/// ```
pub fn init() {
    builder("info").init();
}

/// Initialize logging for tests at `debug`. Safe to call from every test.
pub fn init_test() {
    let _ = builder("debug").is_test(true).try_init();
}

fn builder(default_filter: &str) -> env_logger::Builder {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_filter)
    );
    builder.format_timestamp(None);
    builder
}
