use crate::metrics::cell::MetricsCell;
use crate::metrics::traits::{MetricsReset, WindowMetricsReadRecorder, WindowMetricsRecorder};

#[derive(Debug, Default)]
pub struct WindowMetrics {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,
    pub fetch_calls: u64,
    pub fetched_entries: u64,
    pub window_replacements: u64,
    pub not_found: u64,
    pub fetch_failures: u64,
    pub decode_failures: u64,
    pub peek_calls: MetricsCell,
    pub peek_found: MetricsCell,
}

impl WindowMetrics {
    pub fn new() -> WindowMetrics {
        Self::default()
    }
}

impl WindowMetricsRecorder for WindowMetrics {
    fn record_get_hit(&mut self) {
        self.get_calls += 1;
        self.get_hits += 1;
    }

    fn record_get_miss(&mut self) {
        self.get_calls += 1;
        self.get_misses += 1;
    }

    fn record_fetch_call(&mut self) {
        self.fetch_calls += 1;
    }

    fn record_fetched_entries(&mut self, count: usize) {
        self.fetched_entries += count as u64;
    }

    fn record_window_replaced(&mut self) {
        self.window_replacements += 1;
    }

    fn record_not_found(&mut self) {
        self.not_found += 1;
    }

    fn record_fetch_failure(&mut self) {
        self.fetch_failures += 1;
    }

    fn record_decode_failure(&mut self) {
        self.decode_failures += 1;
    }
}

impl WindowMetricsReadRecorder for &WindowMetrics {
    fn record_peek_call(&self) {
        self.peek_calls.incr();
    }

    fn record_peek_found(&self) {
        self.peek_found.incr();
    }
}

impl MetricsReset for WindowMetrics {
    fn reset_metrics(&mut self) {
        *self = WindowMetrics::default();
    }
}
