//! No-op metrics sink

use std::time::Duration;

use super::traits::MetricsSink;

/// A sink that discards every event
///
/// The resolver's default when no sink is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMetrics;

impl NoOpMetrics {
    pub fn new() -> Self {
        Self
    }
}

impl MetricsSink for NoOpMetrics {
    fn on_resolve(&self, _key: &str, _source: &str, _depth: usize, _latency: Duration) {}
    fn on_miss(&self, _key: &str) {}
}
