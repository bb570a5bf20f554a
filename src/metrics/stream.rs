use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::wrappers::IntervalStream;
use tokio_stream::StreamExt;

use super::report::{format_stats, MetricsExport};
use super::store::MetricsStore;

/// Nominal window label stamped on every export — the store keeps the
/// most recent N samples, this just tells the consumer what the dial
/// is set to.
const EXPORT_WINDOW_MS: u64 = 60_000;

// ─── GET /api/metrics ────────────────────────────────────────────
/// Returns a single JSON snapshot — useful for curl / debugging and
/// for external scrapers that want a one-shot pull.

pub async fn get_metrics(State(store): State<Arc<MetricsStore>>) -> Json<MetricsExport> {
    Json(store.export_snapshot(EXPORT_WINDOW_MS))
}

// ─── GET /api/metrics/summary ────────────────────────────────────
/// Plaintext table: one formatted stats line per endpoint, busiest first.

pub async fn metrics_summary(State(store): State<Arc<MetricsStore>>) -> String {
    let all = store.all_endpoint_stats();
    if all.is_empty() {
        return format_stats(None);
    }
    all.iter()
        .map(|entry| format!("{}  {}", entry.endpoint, format_stats(Some(&entry.stats))))
        .collect::<Vec<_>>()
        .join("\n")
}

// ─── GET /api/metrics/stream ─────────────────────────────────────
/// Server-Sent Events endpoint.
/// Pushes a full export snapshot as JSON once per second. Each
/// connection drives its own interval; the store never runs a
/// background flush of its own.

pub async fn metrics_stream(
    State(store): State<Arc<MetricsStore>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>> {
    let interval = tokio::time::interval(Duration::from_secs(1));

    let stream = IntervalStream::new(interval).map(move |_| {
        let snapshot = store.export_snapshot(EXPORT_WINDOW_MS);
        let json = serde_json::to_string(&snapshot).unwrap_or_default();
        Ok(Event::default().data(json))
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}
