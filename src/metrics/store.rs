use std::collections::HashMap;
use std::time::Instant;

use chrono::Utc;
use parking_lot::Mutex;

use super::Sample;

// ─── Configuration ───────────────────────────────────────────────

/// Samples kept per endpoint unless the first recording call says otherwise.
pub const DEFAULT_CAPACITY: usize = 1000;

// ─── Ring buffer ─────────────────────────────────────────────────

/// Fixed-capacity ring of the most recent samples for one endpoint.
///
/// Implemented as a pre-sized arena plus a write cursor: the buffer fills
/// up to `capacity`, then each insert overwrites the logically oldest slot.
/// Slice order is not chronological once the ring has wrapped — readers
/// that care about time use `recorded_at`, percentile math ignores order.
pub(crate) struct EndpointBuffer {
    capacity: usize,
    samples: Vec<Sample>,
    write_idx: usize,
}

impl EndpointBuffer {
    pub(crate) fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            samples: Vec::with_capacity(capacity),
            write_idx: 0,
        }
    }

    pub(crate) fn push(&mut self, sample: Sample) {
        if self.samples.len() < self.capacity {
            self.samples.push(sample);
        } else {
            self.samples[self.write_idx] = sample;
            self.write_idx = (self.write_idx + 1) % self.capacity;
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.samples.len()
    }

    pub(crate) fn samples(&self) -> &[Sample] {
        &self.samples
    }
}

// ─── Registry ────────────────────────────────────────────────────

/// Thread-safe endpoint registry: one ring buffer per endpoint key.
///
/// Handlers (via the recorder middleware) call `record_response_time`,
/// the reporting surface reads freshly computed stats on demand. The
/// store is plain state behind a mutex — production holds one instance
/// in an `Arc`, tests instantiate their own.
pub struct MetricsStore {
    pub(super) inner: Mutex<HashMap<String, EndpointBuffer>>,
}

impl MetricsStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Record one completed request with the default window capacity.
    pub fn record_response_time(&self, endpoint: &str, latency_ms: f64, status: u16) {
        self.record_with_capacity(endpoint, latency_ms, status, DEFAULT_CAPACITY);
    }

    /// Record one completed request, creating the endpoint's buffer with
    /// `capacity` if this is the first sample for it. The capacity of the
    /// first call wins for the endpoint's lifetime; later values are
    /// ignored rather than resizing a live ring.
    pub fn record_with_capacity(
        &self,
        endpoint: &str,
        latency_ms: f64,
        status: u16,
        capacity: usize,
    ) {
        let sample = Sample {
            latency_ms,
            status,
            recorded_at: Utc::now().timestamp_millis(),
        };

        let mut buffers = self.inner.lock();
        buffers
            .entry(endpoint.to_owned())
            .or_insert_with(|| EndpointBuffer::new(capacity))
            .push(sample);
    }

    /// For call sites that time themselves: round the elapsed time to whole
    /// milliseconds, record it, and hand the rounded value back.
    pub fn measure_response_time(&self, start: Instant, endpoint: &str, status: u16) -> u64 {
        self.measure_with_capacity(start, endpoint, status, DEFAULT_CAPACITY)
    }

    pub fn measure_with_capacity(
        &self,
        start: Instant,
        endpoint: &str,
        status: u16,
        capacity: usize,
    ) -> u64 {
        let rounded = (start.elapsed().as_secs_f64() * 1000.0).round() as u64;
        self.record_with_capacity(endpoint, rounded as f64, status, capacity);
        rounded
    }

    /// Number of distinct endpoints currently tracked.
    pub fn size(&self) -> usize {
        self.inner.lock().len()
    }

    /// Total samples held across every endpoint buffer.
    pub fn total_samples(&self) -> usize {
        self.inner.lock().values().map(EndpointBuffer::len).sum()
    }

    /// Drop every endpoint and its buffer. Test isolation and operational
    /// reset only — not wired to any production route.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

impl Default for MetricsStore {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────
