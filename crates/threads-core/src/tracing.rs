use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize stdout tracing. Call once at service startup.
///
/// Filtering follows `RUST_LOG` (default `info`). Output is JSON unless
/// `LOG_FORMAT=pretty`, which is easier to read during local development.
///
/// Safe to call multiple times; later calls are ignored.
pub fn init_tracing() {
    let pretty = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("pretty"));
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let output = if pretty {
        fmt::layer().pretty().boxed()
    } else {
        fmt::layer().json().boxed()
    };
    let _ = tracing_subscriber::registry()
        .with(output)
        .with(filter)
        .try_init();
}
