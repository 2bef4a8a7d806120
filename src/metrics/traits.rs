//! # Metrics Trait Hierarchy
//!
//! Separates *recording*, *snapshotting*, and *export* into small traits so
//! the window cache's state machine never depends on how its counters are
//! consumed.
//!
//! ## Architecture
//!
//! ```text
//!                ┌──────────────────────────────────────┐
//!                │        WindowMetricsRecorder         │
//!                │  get_hit / get_miss                  │
//!                │  fetch_call / fetched_entries        │
//!                │  window_replaced / not_found         │
//!                │  fetch_failure / decode_failure      │
//!                └──────────────────┬───────────────────┘
//!                                   │ written by SequentialWindowCache::get
//!                                   ▼
//!                         ┌───────────────────┐
//!                         │   WindowMetrics   │◄──── WindowMetricsReadRecorder
//!                         └─────────┬─────────┘      (peek, via &self)
//!                                   │
//!   Consumption (decoupled from recording):
//!   ┌──────────────────────────────┐    ┌──────────────────────────────┐
//!   │ MetricsSnapshotProvider<S>   │    │ MetricsExporter<S>           │
//!   │ (bench/test)                 │    │ (production monitoring)      │
//!   └──────────────────────────────┘    └──────────────────────────────┘
//! ```

/// Counters written on the `get` path.
pub trait WindowMetricsRecorder {
    /// Key found in the current window; no fetch.
    fn record_get_hit(&mut self);
    /// Key absent from the current window (or no window yet).
    fn record_get_miss(&mut self);
    fn record_fetch_call(&mut self);
    /// Number of entries a successful fetch returned (after truncation).
    fn record_fetched_entries(&mut self, count: usize);
    /// A new window became current.
    fn record_window_replaced(&mut self);
    fn record_not_found(&mut self);
    fn record_fetch_failure(&mut self);
    fn record_decode_failure(&mut self);
}

/// Counters for `&self` paths (uses interior mutability).
pub trait WindowMetricsReadRecorder {
    fn record_peek_call(&self);
    fn record_peek_found(&self);
}

/// Snapshot provider for bench/testing.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

/// Reset metrics between scans or benchmark iterations.
pub trait MetricsReset {
    fn reset_metrics(&mut self);
}

/// Export/publish metrics to production monitoring backends.
pub trait MetricsExporter<S> {
    fn export(&self, snapshot: &S);
}
