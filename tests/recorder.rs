use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware as axum_mw,
    response::IntoResponse,
    routing::get,
    Router,
};
use tower::ServiceExt;

use latency_observatory::{record_response_time, MetricsStore, RecorderConfig, RecorderLayerState};

fn wrapped<H, T>(store: &Arc<MetricsStore>, config: RecorderConfig, handler: H) -> Router
where
    H: axum::handler::Handler<T, ()>,
    T: 'static,
{
    Router::new().route("/api/test", get(handler)).route_layer(
        axum_mw::from_fn_with_state(
            RecorderLayerState::new(Arc::clone(store), config),
            record_response_time,
        ),
    )
}

async fn hit(app: Router) -> axum::response::Response {
    app.oneshot(
        Request::builder()
            .uri("/api/test")
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn records_sample_and_attaches_timing_header() {
    let store = Arc::new(MetricsStore::new());
    let app = wrapped(&store, RecorderConfig::new("/api/test"), || async {
        "ok"
    });

    let response = hit(app).await;
    assert_eq!(response.status(), StatusCode::OK);

    let header = response
        .headers()
        .get("X-Response-Time")
        .expect("header missing")
        .to_str()
        .unwrap();
    // shape: integer millis + "ms" suffix, e.g. "3ms"
    let digits = header.strip_suffix("ms").expect("no ms suffix");
    assert!(!digits.is_empty());
    assert!(digits.chars().all(|c| c.is_ascii_digit()), "got {header}");

    let stats = store.stats_for("/api/test").expect("no sample recorded");
    assert_eq!(stats.sample_count, 1);
    assert_eq!(stats.success_count, 1);
}

#[tokio::test]
async fn error_status_responses_are_classified() {
    let store = Arc::new(MetricsStore::new());
    let app = wrapped(&store, RecorderConfig::new("/api/test"), || async {
        StatusCode::NOT_FOUND
    });

    let response = hit(app).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.headers().contains_key("X-Response-Time"));

    let stats = store.stats_for("/api/test").unwrap();
    assert_eq!(stats.sample_count, 1);
    assert_eq!(stats.client_error_count, 1);
    assert_eq!(stats.success_count, 0);
}

#[tokio::test]
async fn header_can_be_disabled_without_skipping_the_sample() {
    let store = Arc::new(MetricsStore::new());
    let config = RecorderConfig::new("/api/test").include_headers(false);
    let app = wrapped(&store, config, || async { "ok" });

    let response = hit(app).await;
    assert!(!response.headers().contains_key("X-Response-Time"));
    assert_eq!(store.total_samples(), 1);
}

#[tokio::test]
async fn existing_response_headers_survive() {
    let store = Arc::new(MetricsStore::new());
    let app = wrapped(&store, RecorderConfig::new("/api/test"), || async {
        ([("X-Custom", "kept")], "ok").into_response()
    });

    let response = hit(app).await;
    assert_eq!(response.headers().get("X-Custom").unwrap(), "kept");
    assert!(response.headers().contains_key("X-Response-Time"));
}

#[tokio::test]
async fn wrapper_capacity_bounds_the_window() {
    let store = Arc::new(MetricsStore::new());
    let config = RecorderConfig::new("/api/test").capacity(3);
    let app = wrapped(&store, config, || async { "ok" });

    for _ in 0..5 {
        let response = hit(app.clone()).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let stats = store.stats_for("/api/test").unwrap();
    assert_eq!(stats.sample_count, 3);
}

#[tokio::test]
async fn handler_panic_propagates_and_records_nothing() {
    let store = Arc::new(MetricsStore::new());
    let app = wrapped(&store, RecorderConfig::new("/api/test"), || async {
        panic!("boom");
        #[allow(unreachable_code)]
        ()
    });

    // No response ever comes back, so the failed invocation must not
    // enter the latency distribution.
    let result = tokio::spawn(hit(app)).await;
    assert!(result.unwrap_err().is_panic());
    assert_eq!(store.total_samples(), 0);
    assert!(store.stats_for("/api/test").is_none());
}

#[tokio::test]
async fn each_request_adds_exactly_one_sample() {
    let store = Arc::new(MetricsStore::new());
    let app = wrapped(&store, RecorderConfig::new("/api/test"), || async {
        "ok"
    });

    for expected in 1..=4 {
        hit(app.clone()).await;
        assert_eq!(store.total_samples(), expected);
    }
    assert_eq!(store.size(), 1);
}
