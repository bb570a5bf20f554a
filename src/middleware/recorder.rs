use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::metrics::{MetricsStore, DEFAULT_CAPACITY};

/// Per-route configuration for the response-time recorder.
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// Aggregation key — a stable route template, never a raw URL
    pub endpoint: String,
    /// Attach an `X-Response-Time` header to outgoing responses
    pub include_headers: bool,
    /// Window size for this endpoint's sample buffer
    pub capacity: usize,
}

impl RecorderConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            include_headers: true,
            capacity: DEFAULT_CAPACITY,
        }
    }

    pub fn include_headers(mut self, include: bool) -> Self {
        self.include_headers = include;
        self
    }

    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}

/// State handed to `axum::middleware::from_fn_with_state` per route.
#[derive(Clone)]
pub struct RecorderLayerState {
    pub store: Arc<MetricsStore>,
    pub config: RecorderConfig,
}

impl RecorderLayerState {
    pub fn new(store: Arc<MetricsStore>, config: RecorderConfig) -> Self {
        Self { store, config }
    }
}

/// Tower-compatible middleware that times the wrapped handler and feeds
/// the metrics store.
///
/// The handler itself is the only await point; everything before and
/// after is synchronous so the elapsed time reflects handler latency,
/// not telemetry overhead. A handler that panics or is cancelled never
/// produces a response here, so nothing is recorded for it — only
/// responses (including error-status ones) enter the distribution.
///
/// Also prints a coloured one-liner to stdout for development.
pub async fn record_response_time(
    State(layer): State<RecorderLayerState>,
    req: Request,
    next: Next,
) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let start = Instant::now();
    let mut response = next.run(req).await;
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    let status = response.status().as_u16();
    layer.store.record_with_capacity(
        &layer.config.endpoint,
        elapsed_ms,
        status,
        layer.config.capacity,
    );

    // ── Inject response header ──────────────────────────────────
    // Best-effort: a value that fails to parse must not fail the request.
    if layer.config.include_headers {
        let value = format!("{}ms", elapsed_ms.round() as u64);
        if let Ok(value) = value.parse() {
            response.headers_mut().insert("X-Response-Time", value);
        }
    }

    // ── Console log ─────────────────────────────────────────────
    let colour = match status {
        200..=299 => "\x1b[32m", // green
        400..=499 => "\x1b[33m", // yellow
        _ => "\x1b[31m",        // red
    };
    // Skip noisy SSE requests
    if path.starts_with("/api/") && !path.contains("/stream") {
        println!(
            "  {colour}{status}\x1b[0m  {method:<5} {path:<35} {:>7.2}ms",
            elapsed_ms
        );
    }

    response
}
