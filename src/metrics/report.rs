use chrono::{DateTime, Utc};
use serde::Serialize;

use super::percentiles::{compute_stats, PercentileStats};
use super::store::MetricsStore;

// ─── Public types ────────────────────────────────────────────────

/// Per-endpoint stats plus window bookkeeping, as shipped in the export.
#[derive(Debug, Clone, Serialize)]
pub struct EndpointStats {
    pub endpoint: String,
    #[serde(flatten)]
    pub stats: PercentileStats,
    /// Oldest sample still in the window (epoch ms)
    pub oldest_sample: i64,
    /// Newest sample in the window (epoch ms)
    pub newest_sample: i64,
    /// Span covered by the window; 0 with a single sample
    pub time_range_ms: i64,
}

/// Lightweight per-endpoint row for dashboards and the summary table.
#[derive(Debug, Clone, Serialize)]
pub struct EndpointSummary {
    pub endpoint: String,
    pub sample_count: usize,
    /// Percentage of 4xx/5xx samples, rounded to a whole number
    pub error_rate: u32,
}

/// Complete snapshot suitable for one-shot transmission to an external
/// monitoring system.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsExport {
    pub timestamp: DateTime<Utc>,
    /// Nominal window label supplied by the caller, not derived from data
    pub window_ms: u64,
    pub endpoints: Vec<EndpointStats>,
    pub totals: ExportTotals,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ExportTotals {
    pub endpoints: usize,
    pub samples: usize,
}

// ─── Read-only queries ───────────────────────────────────────────

impl MetricsStore {
    /// Fresh percentile stats for one endpoint. `None` when the endpoint
    /// is unknown — callers cannot tell that apart from "no samples yet",
    /// and should not need to.
    pub fn stats_for(&self, endpoint: &str) -> Option<PercentileStats> {
        let buffers = self.inner.lock();
        buffers.get(endpoint).and_then(|b| compute_stats(b.samples()))
    }

    /// Stats plus the endpoint name and the time span of its window.
    pub fn stats_for_endpoint(&self, endpoint: &str) -> Option<EndpointStats> {
        let buffers = self.inner.lock();
        let buffer = buffers.get(endpoint)?;
        endpoint_stats(endpoint, buffer.samples())
    }

    /// One entry per tracked endpoint, busiest first (sample count
    /// descending, ties broken by endpoint name for a stable order).
    pub fn all_endpoint_stats(&self) -> Vec<EndpointStats> {
        let buffers = self.inner.lock();
        let mut all: Vec<EndpointStats> = buffers
            .iter()
            .filter_map(|(endpoint, buffer)| endpoint_stats(endpoint, buffer.samples()))
            .collect();
        drop(buffers);

        all.sort_by(|a, b| {
            b.stats
                .sample_count
                .cmp(&a.stats.sample_count)
                .then_with(|| a.endpoint.cmp(&b.endpoint))
        });
        all
    }

    /// Per-endpoint error-rate rows, in the same busiest-first order.
    pub fn endpoint_summaries(&self) -> Vec<EndpointSummary> {
        self.all_endpoint_stats()
            .into_iter()
            .map(|entry| {
                let errors = entry.stats.client_error_count + entry.stats.server_error_count;
                let error_rate = if errors == 0 {
                    0
                } else {
                    (100.0 * errors as f64 / entry.stats.sample_count as f64).round() as u32
                };
                EndpointSummary {
                    endpoint: entry.endpoint,
                    sample_count: entry.stats.sample_count,
                    error_rate,
                }
            })
            .collect()
    }

    /// Build the full serializable snapshot: every endpoint's stats plus
    /// overall totals. `window_ms` is a caller-fixed label for the
    /// consumer's benefit.
    pub fn export_snapshot(&self, window_ms: u64) -> MetricsExport {
        let endpoints = self.all_endpoint_stats();
        let samples = endpoints.iter().map(|e| e.stats.sample_count).sum();
        MetricsExport {
            timestamp: Utc::now(),
            window_ms,
            totals: ExportTotals {
                endpoints: endpoints.len(),
                samples,
            },
            endpoints,
        }
    }
}

fn endpoint_stats(endpoint: &str, samples: &[super::Sample]) -> Option<EndpointStats> {
    let stats = compute_stats(samples)?;
    // slice order is not chronological once the ring wraps, so scan timestamps
    let oldest_sample = samples.iter().map(|s| s.recorded_at).min().unwrap_or(0);
    let newest_sample = samples.iter().map(|s| s.recorded_at).max().unwrap_or(0);
    Some(EndpointStats {
        endpoint: endpoint.to_owned(),
        stats,
        oldest_sample,
        newest_sample,
        time_range_ms: newest_sample - oldest_sample,
    })
}

// ─── Formatting ──────────────────────────────────────────────────

/// One-line human-readable rendering of a stat set, for the summary
/// table and log output.
pub fn format_stats(stats: Option<&PercentileStats>) -> String {
    let Some(s) = stats else {
        return "No data available".to_owned();
    };
    format!(
        "p50={:.0}ms p95={:.0}ms p99={:.0}ms min={:.0}ms max={:.0}ms avg={:.1}ms \
         samples={} success={} clientErr={} serverErr={}",
        s.p50,
        s.p95,
        s.p99,
        s.min,
        s.max,
        s.avg,
        s.sample_count,
        s.success_count,
        s.client_error_count,
        s.server_error_count,
    )
}

// ─── Tests ───────────────────────────────────────────────────────
