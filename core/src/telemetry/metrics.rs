use serde::Serialize;
use std::sync::Mutex;

/// Scan counters shared by every flight analysed in one run.
pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub flights: usize,
    pub failed_flights: usize,
    pub samples: usize,
    pub malformed_samples: usize,
    pub skipped_candidates: usize,
    pub approaches: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    fn update(&self, apply: impl FnOnce(&mut MetricsSnapshot)) {
        if let Ok(mut metrics) = self.inner.lock() {
            apply(&mut metrics);
        }
    }

    pub fn record_flight(&self, samples: usize) {
        self.update(|m| {
            m.flights += 1;
            m.samples += samples;
        });
    }

    pub fn record_failure(&self) {
        self.update(|m| m.failed_flights += 1);
    }

    pub fn record_malformed(&self, count: usize) {
        self.update(|m| m.malformed_samples += count);
    }

    pub fn record_skipped_candidate(&self) {
        self.update(|m| m.skipped_candidates += 1);
    }

    pub fn record_approaches(&self, count: usize) {
        self.update(|m| m.approaches += count);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
