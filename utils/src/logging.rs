//! Structured logging initialization via `tracing`.

/// Initialize the tracing subscriber.
///
/// `level` is the default filter directive; the `RUST_LOG` environment
/// variable takes precedence when set. `format` selects between human
/// readable output and JSON lines (`"json"`).
pub fn init_tracing(level: &str, format: &str) {
    use tracing_subscriber::EnvFilter;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}
