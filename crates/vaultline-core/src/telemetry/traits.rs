//! Metrics sink trait definition

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

/// Source tag reported for cache hits
pub const CACHE_SOURCE: &str = "cache";

/// Receiver for resolution outcomes
///
/// Exactly one callback fires per `resolve` call: `on_resolve` on success,
/// `on_miss` on failure.
///
/// Implementations:
/// - `NoOpMetrics`: discards everything
/// - `TracingMetrics`: forwards events to `tracing`
/// - `RecordingMetrics`: keeps events in memory for assertions
pub trait MetricsSink: Send + Sync {
    /// A lookup succeeded
    ///
    /// `depth` is 0 for a cache hit and `i + 1` for a hit at chain index `i`.
    fn on_resolve(&self, key: &str, source: &str, depth: usize, latency: Duration);

    /// A lookup exhausted the chain without a value
    fn on_miss(&self, key: &str);
}

/// Type alias for an Arc-wrapped sink
pub type SharedMetrics = Arc<dyn MetricsSink>;

/// Serializable form of one telemetry callback
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ResolutionEvent {
    Resolve {
        key: String,
        source: String,
        depth: usize,
        latency_ms: f64,
    },
    Miss {
        key: String,
    },
}

impl ResolutionEvent {
    pub fn resolve(key: &str, source: &str, depth: usize, latency: Duration) -> Self {
        Self::Resolve {
            key: key.to_string(),
            source: source.to_string(),
            depth,
            latency_ms: latency.as_micros() as f64 / 1000.0,
        }
    }

    pub fn miss(key: &str) -> Self {
        Self::Miss { key: key.to_string() }
    }

    pub fn key(&self) -> &str {
        match self {
            Self::Resolve { key, .. } | Self::Miss { key } => key,
        }
    }
}
