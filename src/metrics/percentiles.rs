use serde::Serialize;

use super::Sample;

/// A complete percentile breakdown for one endpoint's current window.
/// Serialized straight into the JSON export and into the summary table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PercentileStats {
    pub p50: f64,
    pub p95: f64,
    pub p99: f64,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub sample_count: usize,
    pub success_count: usize,
    pub client_error_count: usize,
    pub server_error_count: usize,
}

/// Derive the full stat set from the samples currently in a buffer.
///
/// Pure function over the slice: no registry access, no caching, identical
/// input always yields identical output. Returns `None` when there is
/// nothing to aggregate — callers treat an unknown endpoint and an empty
/// one the same way.
pub fn compute_stats(samples: &[Sample]) -> Option<PercentileStats> {
    if samples.is_empty() {
        return None;
    }

    let mut latencies: Vec<f64> = samples.iter().map(|s| s.latency_ms).collect();
    // total_cmp keeps the sort panic-free even for unexpected values
    latencies.sort_by(f64::total_cmp);

    let n = latencies.len();
    let sum: f64 = latencies.iter().sum();

    let mut success_count = 0;
    let mut client_error_count = 0;
    let mut server_error_count = 0;
    for sample in samples {
        match sample.status {
            200..=299 => success_count += 1,
            400..=499 => client_error_count += 1,
            s if s >= 500 => server_error_count += 1,
            // 1xx/3xx stay unclassified on purpose: redirects are neither
            // successes nor errors in the aggregate breakdown
            _ => {}
        }
    }

    Some(PercentileStats {
        p50: percentile(&latencies, 50.0),
        p95: percentile(&latencies, 95.0),
        p99: percentile(&latencies, 99.0),
        min: latencies[0],
        max: latencies[n - 1],
        avg: sum / n as f64,
        sample_count: n,
        success_count,
        client_error_count,
        server_error_count,
    })
}

/// Nearest-rank selection: index `ceil(p/100 * n) - 1`, clamped to the slice.
/// For a single sample every percentile collapses to that sample's value.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    let rank = (p / 100.0 * n as f64).ceil() as usize;
    sorted[rank.saturating_sub(1).min(n - 1)]
}

// ─── Tests ───────────────────────────────────────────────────────
