//! In-memory metrics sink

use std::time::Duration;

use parking_lot::Mutex;

use super::traits::{MetricsSink, ResolutionEvent};

/// Records every event in order
///
/// Useful for tests and for hosts that batch telemetry before shipping it.
///
/// # Example
///
/// ```
/// use vaultline_core::telemetry::{MetricsSink, RecordingMetrics};
///
/// let sink = RecordingMetrics::new();
/// sink.on_miss("db");
/// assert_eq!(sink.misses(), 1);
/// ```
#[derive(Debug, Default)]
pub struct RecordingMetrics {
    events: Mutex<Vec<ResolutionEvent>>,
}

impl RecordingMetrics {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of the recorded events
    pub fn events(&self) -> Vec<ResolutionEvent> {
        self.events.lock().clone()
    }

    /// Remove and return the recorded events
    pub fn take(&self) -> Vec<ResolutionEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn resolves(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| matches!(e, ResolutionEvent::Resolve { .. }))
            .count()
    }

    pub fn misses(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| matches!(e, ResolutionEvent::Miss { .. }))
            .count()
    }

    /// The recorded events serialized as a JSON array
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&*self.events.lock())
    }
}

impl MetricsSink for RecordingMetrics {
    fn on_resolve(&self, key: &str, source: &str, depth: usize, latency: Duration) {
        self.events
            .lock()
            .push(ResolutionEvent::resolve(key, source, depth, latency));
    }

    fn on_miss(&self, key: &str) {
        self.events.lock().push(ResolutionEvent::miss(key));
    }
}
