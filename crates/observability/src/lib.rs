//! Tracing, logging and real-user monitoring (shared setup).

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Tracing configuration (filters, layers).
pub mod tracing;

/// Real-user monitoring events and sinks.
pub mod rum;

/// Delivery of RUM events to an HTTP collector.
#[cfg(not(target_arch = "wasm32"))]
pub mod rum_http;

pub use rum::{InMemoryRumSink, RumConfig, RumEvent, RumSink, TracingRumSink};
#[cfg(not(target_arch = "wasm32"))]
pub use rum_http::HttpRumSink;

/// Build the sink a native process should report to.
///
/// Events go to the collector when one is configured, otherwise they are only
/// logged.
#[cfg(not(target_arch = "wasm32"))]
pub fn rum_sink(config: &RumConfig) -> std::sync::Arc<dyn RumSink> {
    match config.collector_url.as_deref() {
        Some(url) => {
            ::tracing::info!("reporting RUM events to {}", url);
            std::sync::Arc::new(HttpRumSink::new(config.clone()))
        }
        None => {
            ::tracing::info!("no RUM collector configured; RUM events are logged only");
            std::sync::Arc::new(TracingRumSink)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init();
        init();
        ::tracing::info!("observability initialized twice");
    }

    #[test]
    fn no_collector_means_logging_sink() {
        let sink = rum_sink(&RumConfig::default());
        sink.emit(RumEvent::action("noop", &serde_json::json!({})));
    }
}
