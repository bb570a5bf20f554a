pub mod percentiles;
pub mod report;
pub mod store;
pub mod stream;

pub use percentiles::{compute_stats, PercentileStats};
pub use report::{format_stats, EndpointStats, EndpointSummary, MetricsExport};
pub use store::{MetricsStore, DEFAULT_CAPACITY};

use serde::Serialize;

/// A single timing observation for one completed request.
/// This is the "write" side — the middleware creates these and pushes them in.
#[derive(Debug, Clone, Serialize)]
pub struct Sample {
    /// Handler wall time in milliseconds
    pub latency_ms: f64,
    /// HTTP status code the response carried
    pub status: u16,
    /// Wall-clock time of the observation (epoch milliseconds).
    /// Window bookkeeping only — percentile math never looks at it.
    pub recorded_at: i64,
}
