//! Single-window read-ahead cache.
//!
//! Answers point lookups against an ordered, paginated backing store while
//! amortizing one backing round trip over up to `batch_size` lookups, as
//! long as callers mostly ask for keys in ascending store order.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                   SequentialWindowCache<K, F, D> Layout                     │
//! │                                                                             │
//! │   batch_size: usize               (fixed at construction)                   │
//! │   fetcher:    F: WindowFetcher<K>                                           │
//! │   decoder:    D: RecordDecoder<F::Raw>                                      │
//! │                                                                             │
//! │   state: CacheState<K, V>                                                   │
//! │   ┌──────────────┐    get(k)     ┌────────────────────────────────────┐     │
//! │   │    Empty     │ ────────────► │  Loaded(Window<K, V>)              │     │
//! │   └──────────────┘    fetch      │                                    │     │
//! │                                  │  hit:  lookup, no transition       │     │
//! │                                  │  miss: fetch, replace wholesale ─┐ │     │
//! │                                  └──────────────────────────────────┼─┘     │
//! │                                                 ▲                   │       │
//! │                                                 └───────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Algorithm
//!
//! ```text
//! GET(key):
//!   1. If the current window holds key: return its value      (O(1), no I/O)
//!   2. rows   = fetcher.fetch(key, batch_size)                (one round trip)
//!      values = decoder.decode(row) for each row
//!      window = Window(rows[..batch_size])                    (built off to the side)
//!   3. Swap window in, discarding the old one even if keys overlap
//!   4. Return window[key], or NotFound
//!
//! On fetch or decode failure nothing is swapped: the previous window stays
//! current and the same key can be retried.
//! ```
//!
//! ## Access Patterns
//!
//! | Pattern                               | Fetches                         |
//! |---------------------------------------|---------------------------------|
//! | ascending keys inside one window      | 1 per window                    |
//! | forward jump past the window          | 1                               |
//! | backward jump to an evicted key       | 1, however recent the eviction  |
//! | repeated lookup of an absent key      | 1 per lookup (no negative cache)|
//!
//! ## Ownership
//!
//! `get` takes `&mut self` and the type is `!Sync`: one cache belongs to one
//! scan. Run independent scans on independent caches (see
//! [`WindowCacheFactory`](crate::builder::WindowCacheFactory)) rather than
//! sharing one behind a lock, which would serialize every miss.
//!
//! ## Example Usage
//!
//! ```
//! use seqwindow::cache::SequentialWindowCache;
//! use seqwindow::traits::{fetch_fn, IdentityDecoder};
//!
//! let store: Vec<(u32, &str)> = (0..100).map(|k| (k, "row")).collect();
//! let fetcher = fetch_fn(move |start: &u32, max: usize| {
//!     Ok::<_, std::io::Error>(
//!         store.iter().filter(|(k, _)| k >= start).take(max).copied().collect::<Vec<_>>(),
//!     )
//! });
//!
//! let mut cache = SequentialWindowCache::new(10, fetcher, IdentityDecoder);
//! for key in 0..10 {
//!     assert_eq!(cache.get(&key).unwrap(), &"row");
//! }
//! assert_eq!(cache.window_len(), 10);
//! ```

use std::cell::Cell;
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use crate::error::{InvariantError, WindowError};
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::WindowMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::WindowMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{
    MetricsReset, MetricsSnapshotProvider, WindowMetricsReadRecorder, WindowMetricsRecorder,
};
use crate::traits::{RecordDecoder, WindowFetcher};
use crate::window::Window;

/// Value type produced by a cache's decoder.
pub type ValueOf<K, F, D> = <D as RecordDecoder<<F as WindowFetcher<K>>::Raw>>::Value;

/// Error type returned by a cache's `get`.
pub type GetError<K, F, D> = WindowError<
    <F as WindowFetcher<K>>::Error,
    <D as RecordDecoder<<F as WindowFetcher<K>>::Raw>>::Error,
>;

/// The two states of the cache. There is no terminal state.
#[derive(Debug)]
pub enum CacheState<K, V> {
    /// No lookup has been made yet.
    Empty,
    /// The window from the most recent fetch, possibly with no entries.
    Loaded(Window<K, V>),
}

impl<K, V> CacheState<K, V> {
    #[inline]
    fn window(&self) -> Option<&Window<K, V>> {
        match self {
            CacheState::Empty => None,
            CacheState::Loaded(window) => Some(window),
        }
    }
}

/// Read-ahead cache holding at most one window of decoded entries.
///
/// # Type Parameters
///
/// - `K`: Key type, must be `Eq + Hash + Clone`; its ordering is defined by
///   the backing store, not by the cache
/// - `F`: the [`WindowFetcher`] performing backing round trips
/// - `D`: the [`RecordDecoder`] turning `F::Raw` into values
///
/// # Example
///
/// ```
/// use seqwindow::cache::SequentialWindowCache;
/// use seqwindow::traits::{decode_fn, fetch_fn};
///
/// let fetcher = fetch_fn(|start: &u64, max: usize| {
///     Ok::<_, std::io::Error>((*start..*start + max as u64).map(|k| (k, k.to_string())).collect::<Vec<_>>())
/// });
/// let decoder = decode_fn(|raw: String| raw.parse::<u64>());
///
/// let mut cache = SequentialWindowCache::new(4, fetcher, decoder);
/// assert_eq!(cache.get(&7).copied().unwrap(), 7);
/// // 8, 9 and 10 were read ahead
/// assert_eq!(cache.peek(&10), Some(&10));
/// assert_eq!(cache.peek(&11), None);
/// ```
pub struct SequentialWindowCache<K, F, D>
where
    F: WindowFetcher<K>,
    D: RecordDecoder<F::Raw>,
{
    batch_size: usize,
    fetcher: F,
    decoder: D,
    state: CacheState<K, D::Value>,
    #[cfg(feature = "metrics")]
    metrics: WindowMetrics,
    // One cache per scan: keep the type !Sync regardless of K, V, F, D.
    _not_sync: PhantomData<Cell<()>>,
}

impl<K, F, D> SequentialWindowCache<K, F, D>
where
    K: Eq + Hash + Clone,
    F: WindowFetcher<K>,
    D: RecordDecoder<F::Raw>,
{
    /// Creates an empty cache that loads `batch_size` entries per fetch.
    ///
    /// A `batch_size` of 0 is clamped to 1. Use
    /// [`WindowCacheBuilder::try_build`](crate::builder::WindowCacheBuilder::try_build)
    /// to reject it instead.
    #[inline]
    pub fn new(batch_size: usize, fetcher: F, decoder: D) -> Self {
        Self {
            batch_size: batch_size.max(1),
            fetcher,
            decoder,
            state: CacheState::Empty,
            #[cfg(feature = "metrics")]
            metrics: WindowMetrics::default(),
            _not_sync: PhantomData,
        }
    }

    /// Returns the value for `key`, fetching a new window on a miss.
    ///
    /// A hit performs no I/O. A miss performs exactly one
    /// [`WindowFetcher::fetch`] starting at `key` and replaces the current
    /// window with the result, even if the two overlap.
    ///
    /// # Errors
    ///
    /// - [`WindowError::NotFound`] if the fetched window does not hold `key`
    ///   (including an empty fetch). The fetched window still becomes
    ///   current; absent keys are not remembered, so asking again fetches
    ///   again.
    /// - [`WindowError::Fetch`] / [`WindowError::Decode`] if a collaborator
    ///   fails. The previous window stays current.
    ///
    /// # Example
    ///
    /// ```
    /// use seqwindow::cache::SequentialWindowCache;
    /// use seqwindow::traits::{fetch_fn, IdentityDecoder};
    ///
    /// let fetcher = fetch_fn(|start: &u32, _max: usize| {
    ///     Ok::<_, std::io::Error>(if *start < 5 { vec![(*start, ())] } else { vec![] })
    /// });
    /// let mut cache = SequentialWindowCache::new(8, fetcher, IdentityDecoder);
    ///
    /// assert!(cache.get(&1).is_ok());
    /// assert!(cache.get(&9).unwrap_err().is_not_found());
    /// ```
    pub fn get(&mut self, key: &K) -> Result<&D::Value, GetError<K, F, D>> {
        let hit = self
            .state
            .window()
            .is_some_and(|window| window.contains(key));

        if hit {
            #[cfg(feature = "metrics")]
            self.metrics.record_get_hit();
        } else {
            #[cfg(feature = "metrics")]
            self.metrics.record_get_miss();
            let window = self.load_window(key)?;
            self.state = CacheState::Loaded(window);
            #[cfg(feature = "metrics")]
            self.metrics.record_window_replaced();
        }

        match self.state.window().and_then(|window| window.get(key)) {
            Some(value) => Ok(value),
            None => {
                #[cfg(feature = "metrics")]
                self.metrics.record_not_found();
                Err(WindowError::NotFound)
            },
        }
    }

    /// Like [`get`](Self::get), but returns an owned value.
    #[inline]
    pub fn get_cloned(&mut self, key: &K) -> Result<D::Value, GetError<K, F, D>>
    where
        D::Value: Clone,
    {
        self.get(key).cloned()
    }

    /// Fetches and decodes the window starting at `key` without touching
    /// the current state.
    fn load_window(&mut self, key: &K) -> Result<Window<K, D::Value>, GetError<K, F, D>> {
        #[cfg(feature = "metrics")]
        self.metrics.record_fetch_call();

        let rows = match self.fetcher.fetch(key, self.batch_size) {
            Ok(rows) => rows,
            Err(err) => {
                #[cfg(feature = "metrics")]
                self.metrics.record_fetch_failure();
                return Err(WindowError::Fetch(err));
            },
        };

        let fetched = rows.len();
        let mut decoded = Vec::with_capacity(fetched.min(self.batch_size));
        for (row_key, raw) in rows.into_iter().take(self.batch_size) {
            match self.decoder.decode(raw) {
                Ok(value) => decoded.push((row_key, value)),
                Err(err) => {
                    #[cfg(feature = "metrics")]
                    self.metrics.record_decode_failure();
                    return Err(WindowError::Decode(err));
                },
            }
        }

        let window = Window::from_entries(decoded);
        #[cfg(feature = "metrics")]
        self.metrics.record_fetched_entries(window.len());
        Ok(window)
    }
}

impl<K, F, D> SequentialWindowCache<K, F, D>
where
    F: WindowFetcher<K>,
    D: RecordDecoder<F::Raw>,
{
    /// Returns the value for `key` if the current window holds it.
    ///
    /// Never fetches and never changes the window.
    #[inline]
    pub fn peek(&self, key: &K) -> Option<&D::Value>
    where
        K: Eq + Hash + Clone,
    {
        #[cfg(feature = "metrics")]
        (&self.metrics).record_peek_call();
        let found = self.state.window().and_then(|window| window.get(key));
        #[cfg(feature = "metrics")]
        if found.is_some() {
            (&self.metrics).record_peek_found();
        }
        found
    }

    /// Returns `true` if the current window holds `key`.
    #[inline]
    pub fn contains(&self, key: &K) -> bool
    where
        K: Eq + Hash + Clone,
    {
        self.state.window().is_some_and(|window| window.contains(key))
    }

    /// Entries fetched per miss.
    #[inline]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of entries in the current window (0 before the first lookup).
    #[inline]
    pub fn window_len(&self) -> usize {
        self.state.window().map_or(0, Window::len)
    }

    /// Returns `true` once a fetch has completed, even an empty one.
    #[inline]
    pub fn is_loaded(&self) -> bool {
        matches!(self.state, CacheState::Loaded(_))
    }

    /// The current window, if any.
    #[inline]
    pub fn window(&self) -> Option<&Window<K, D::Value>> {
        self.state.window()
    }

    /// The current state, `Empty` until the first fetch completes.
    #[inline]
    pub fn state(&self) -> &CacheState<K, D::Value> {
        &self.state
    }

    /// The backing store fetcher.
    #[inline]
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// The record decoder.
    #[inline]
    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Checks that the current window is well formed and within `batch_size`.
    pub fn check_invariants(&self) -> Result<(), InvariantError>
    where
        K: Eq + Hash,
    {
        let Some(window) = self.state.window() else {
            return Ok(());
        };
        if window.len() > self.batch_size {
            return Err(InvariantError::new(format!(
                "window holds {} entries, batch size is {}",
                window.len(),
                self.batch_size
            )));
        }
        window.check_invariants()
    }
}

#[cfg(feature = "metrics")]
impl<K, F, D> SequentialWindowCache<K, F, D>
where
    F: WindowFetcher<K>,
    D: RecordDecoder<F::Raw>,
{
    /// Copies the counters and current gauges into a snapshot.
    pub fn metrics_snapshot(&self) -> WindowMetricsSnapshot {
        WindowMetricsSnapshot {
            get_calls: self.metrics.get_calls,
            get_hits: self.metrics.get_hits,
            get_misses: self.metrics.get_misses,
            fetch_calls: self.metrics.fetch_calls,
            fetched_entries: self.metrics.fetched_entries,
            window_replacements: self.metrics.window_replacements,
            not_found: self.metrics.not_found,
            fetch_failures: self.metrics.fetch_failures,
            decode_failures: self.metrics.decode_failures,
            peek_calls: self.metrics.peek_calls.get(),
            peek_found: self.metrics.peek_found.get(),
            window_len: self.state.window().map_or(0, Window::len),
            batch_size: self.batch_size,
        }
    }
}

#[cfg(feature = "metrics")]
impl<K, F, D> MetricsSnapshotProvider<WindowMetricsSnapshot> for SequentialWindowCache<K, F, D>
where
    F: WindowFetcher<K>,
    D: RecordDecoder<F::Raw>,
{
    fn snapshot(&self) -> WindowMetricsSnapshot {
        self.metrics_snapshot()
    }
}

#[cfg(feature = "metrics")]
impl<K, F, D> MetricsReset for SequentialWindowCache<K, F, D>
where
    F: WindowFetcher<K>,
    D: RecordDecoder<F::Raw>,
{
    fn reset_metrics(&mut self) {
        self.metrics.reset_metrics();
    }
}

impl<K, F, D> fmt::Debug for SequentialWindowCache<K, F, D>
where
    K: fmt::Debug,
    F: WindowFetcher<K>,
    D: RecordDecoder<F::Raw>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let window = self.state.window();
        f.debug_struct("SequentialWindowCache")
            .field("batch_size", &self.batch_size)
            .field("loaded", &window.is_some())
            .field("window_len", &window.map_or(0, Window::len))
            .field("first_key", &window.and_then(Window::first_key))
            .field("last_key", &window.and_then(Window::last_key))
            .finish_non_exhaustive()
    }
}
