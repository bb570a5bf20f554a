use axum::{http::StatusCode, Json};
use serde_json::{json, Value};
use std::time::Duration;

// Demo handlers with distinct latency/status shapes so the recorder has
// something meaningful to chart when the binary runs standalone.

/// Near-instant success.
pub async fn demo_fast() -> Json<Value> {
    Json(json!({ "route": "fast", "ok": true }))
}

/// Simulated slow dependency.
pub async fn demo_slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_millis(25)).await;
    Json(json!({ "route": "slow", "ok": true }))
}

/// Always a client error, so error rates show up in the summaries.
pub async fn demo_missing() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "no such resource", "status": 404 })),
    )
}
