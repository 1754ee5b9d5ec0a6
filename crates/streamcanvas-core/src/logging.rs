use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,streamcanvas=debug,streamcanvas_chart=debug";

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over the built-in filter. Calling this more
/// than once is harmless; later calls leave the first subscriber in place.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Install a subscriber that writes through the test harness capture.
pub fn init_for_tests() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("trace"))
        .with_test_writer()
        .try_init();
}
