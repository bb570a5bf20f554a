use axum::{
    middleware as axum_mw,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::handlers;
use crate::metrics::{stream, MetricsStore};
use crate::middleware::{record_response_time, RecorderConfig, RecorderLayerState};

/// Builds the full Axum `Router`: instrumented demo routes plus the
/// read-only metrics surface.
pub fn create_router(store: Arc<MetricsStore>) -> Router {
    Router::new()
        // ── Demo traffic (each route wrapped with its own recorder) ──
        .merge(instrumented(
            &store,
            "/api/demo/fast",
            get(handlers::demo_fast),
            RecorderConfig::new("/api/demo/fast"),
        ))
        .merge(instrumented(
            &store,
            "/api/demo/slow",
            get(handlers::demo_slow),
            RecorderConfig::new("/api/demo/slow"),
        ))
        .merge(instrumented(
            &store,
            "/api/demo/missing",
            get(handlers::demo_missing),
            RecorderConfig::new("/api/demo/missing"),
        ))
        // ── Metrics ─────────────────────────────────────────────
        .route("/api/metrics", get(stream::get_metrics))
        .route("/api/metrics/summary", get(stream::metrics_summary))
        .route("/api/metrics/stream", get(stream::metrics_stream))
        // ── Provide shared state to the metrics routes ──────────
        .with_state(store)
        // ── Global middleware ───────────────────────────────────
        .layer(CorsLayer::permissive())
}

/// One route plus its response-time recorder, as a mergeable sub-router.
fn instrumented(
    store: &Arc<MetricsStore>,
    path: &str,
    handler: axum::routing::MethodRouter<Arc<MetricsStore>>,
    config: RecorderConfig,
) -> Router<Arc<MetricsStore>> {
    Router::new().route(path, handler).route_layer(
        axum_mw::from_fn_with_state(
            RecorderLayerState::new(Arc::clone(store), config),
            record_response_time,
        ),
    )
}
