//! Metrics sink that forwards to `tracing`

use std::time::Duration;

use super::traits::MetricsSink;

/// Emits each resolution outcome as a `tracing` event
///
/// Events use the `vaultline::telemetry` target so a subscriber can route
/// them separately from diagnostic logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingMetrics;

impl TracingMetrics {
    pub fn new() -> Self {
        Self
    }
}

impl MetricsSink for TracingMetrics {
    fn on_resolve(&self, key: &str, source: &str, depth: usize, latency: Duration) {
        tracing::info!(
            target: "vaultline::telemetry",
            key,
            source,
            depth,
            latency_ms = latency.as_micros() as f64 / 1000.0,
            "secret resolved"
        );
    }

    fn on_miss(&self, key: &str) {
        tracing::info!(target: "vaultline::telemetry", key, "secret not found");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_metrics_without_subscriber() {
        // No subscriber installed; must not panic
        let sink = TracingMetrics::new();
        sink.on_resolve("db", "env", 1, Duration::from_millis(2));
        sink.on_miss("db");
    }
}
