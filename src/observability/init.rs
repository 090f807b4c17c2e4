//! Tracing subscriber setup.

use super::exporter;
use crate::infrastructure::expand_tilde;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Service name attached to exported spans.
const SERVICE_NAME: &str = "mealcast";

/// Initializes the global tracing subscriber.
///
/// Installs an `EnvFilter` (from `RUST_LOG`, else `config.trace_level`, else
/// `"info"`), a compact stderr formatter, and, when `config.trace_file` is set,
/// an OpenTelemetry layer writing spans to that file.
///
/// Safe to call more than once: only the first call installs a subscriber.
/// Failures (e.g. an uncreatable trace directory) disable the span file
/// rather than surfacing an error.
///
/// # Example
///
/// ```rust
/// use mealcast::observability::init_tracing;
/// use mealcast::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
///
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let level = config.trace_level.as_deref().unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let otel_layer = config.trace_file.as_deref().and_then(|raw| {
        let path = expand_tilde(raw);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if std::fs::create_dir_all(parent).is_err() {
                return None;
            }
        }
        let provider = exporter::create_tracer_provider(path, SERVICE_NAME);
        Some(OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME)))
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(otel_layer)
        .try_init();
}
