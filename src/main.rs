use std::sync::Arc;

use latency_observatory::{create_router, MetricsStore};

#[tokio::main]
async fn main() {
    println!();
    println!("╔══════════════════════════════════════════════════╗");
    println!("║   📈  API LATENCY OBSERVATORY                    ║");
    println!("╚══════════════════════════════════════════════════╝");
    println!();

    // ── 1. Build shared state ────────────────────────────────────
    let store = Arc::new(MetricsStore::new());

    // ── 2. Build Axum router ─────────────────────────────────────
    let app = create_router(Arc::clone(&store));

    // ── 3. Bind & serve ──────────────────────────────────────────
    let addr = "0.0.0.0:3000";
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to port 3000 — is it already in use?");

    println!("Server listening on http://localhost:3000");
    println!("Demo traffic    → http://localhost:3000/api/demo/fast");
    println!("Metrics JSON    → http://localhost:3000/api/metrics");
    println!("Metrics summary → http://localhost:3000/api/metrics/summary");
    println!("Metrics SSE     → http://localhost:3000/api/metrics/stream");
    println!();

    axum::serve(listener, app)
        .await
        .expect("Server exited with error");
}
