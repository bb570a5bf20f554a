pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod server;

pub use metrics::{
    compute_stats, format_stats, EndpointStats, EndpointSummary, MetricsExport, MetricsStore,
    PercentileStats, Sample, DEFAULT_CAPACITY,
};
pub use middleware::{record_response_time, RecorderConfig, RecorderLayerState};
pub use server::create_router;
