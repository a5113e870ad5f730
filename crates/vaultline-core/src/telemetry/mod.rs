//! Resolution telemetry
//!
//! The resolver reports every outcome to an injected `MetricsSink`. The sink
//! is owned by the caller. Sinks only ever receive keys, source tags, depths
//! and latencies, never secret values.

mod traits;
mod noop;
mod tracing_sink;
mod recording;

pub use traits::{MetricsSink, SharedMetrics, ResolutionEvent, CACHE_SOURCE};
pub use noop::NoOpMetrics;
pub use tracing_sink::TracingMetrics;
pub use recording::RecordingMetrics;
