/// Initialize tracing for the application.
///
/// Unknown level names fall back to `info`. Safe to call more than once;
/// only the first call installs a subscriber.
pub fn init(default_level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(parse_level(default_level))
        .with_target(false)
        .try_init();
}

pub(crate) fn parse_level(level: &str) -> tracing::Level {
    match level.trim().to_lowercase().as_str() {
        "error" => tracing::Level::ERROR,
        "warn" | "warning" => tracing::Level::WARN,
        "debug" => tracing::Level::DEBUG,
        "trace" => tracing::Level::TRACE,
        _ => tracing::Level::INFO,
    }
}
