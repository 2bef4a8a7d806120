/// Point-in-time copy of a window cache's counters and gauges.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct WindowMetricsSnapshot {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,

    pub fetch_calls: u64,
    pub fetched_entries: u64,
    pub window_replacements: u64,

    pub not_found: u64,
    pub fetch_failures: u64,
    pub decode_failures: u64,

    pub peek_calls: u64,
    pub peek_found: u64,

    // gauges captured at snapshot time
    pub window_len: usize,
    pub batch_size: usize,
}

impl WindowMetricsSnapshot {
    /// Fraction of `get` calls answered without a fetch, in `0.0..=1.0`.
    ///
    /// Returns `0.0` before the first request.
    pub fn hit_ratio(&self) -> f64 {
        if self.get_calls == 0 {
            return 0.0;
        }
        self.get_hits as f64 / self.get_calls as f64
    }

    /// Average number of entries loaded per fetch.
    pub fn mean_window_fill(&self) -> f64 {
        if self.fetch_calls == 0 {
            return 0.0;
        }
        self.fetched_entries as f64 / self.fetch_calls as f64
    }
}
