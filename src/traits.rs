//! # Collaborator Traits
//!
//! The window cache owns no I/O. Everything that touches the backing store
//! is injected through two small traits, so a cache over a SQL table, a
//! paginated REST listing or an in-memory fixture differs only in the
//! values passed to the builder.
//!
//! ## Architecture
//!
//! ```text
//!                 ┌───────────────────────────────────────────┐
//!                 │     SequentialWindowCache<K, F, D>        │
//!                 │                                           │
//!                 │  get(&mut, &K) → Result<&V, WindowError>  │
//!                 └──────────────┬──────────────┬─────────────┘
//!                                │ miss         │ per fetched row
//!                                ▼              ▼
//!   ┌──────────────────────────────────┐  ┌─────────────────────────────────┐
//!   │        WindowFetcher<K>          │  │        RecordDecoder<R>         │
//!   │                                  │  │                                 │
//!   │  type Raw                        │  │  type Value                     │
//!   │  type Error                      │  │  type Error                     │
//!   │  fetch(&K, usize)                │  │  decode(R) → Value              │
//!   │    → Vec<(K, Raw)>               │  │                                 │
//!   └──────────────────────────────────┘  └─────────────────────────────────┘
//! ```
//!
//! ## Contracts
//!
//! | Trait           | Must                                                   | Must not                     |
//! |-----------------|--------------------------------------------------------|------------------------------|
//! | `WindowFetcher` | return entries in store order, starting at `start`     | signal "absent" via `Err`    |
//! |                 | when the store has it; at most `max_count` entries     |                              |
//! | `RecordDecoder` | be pure                                                | access the backing store     |
//!
//! An absent key is an empty `Vec`, never an error. Errors are reserved for
//! connectivity, malformed queries and resource exhaustion, and propagate
//! out of `get` untouched.
//!
//! ## Closures
//!
//! [`fetch_fn`] and [`decode_fn`] wrap plain closures, which is usually all a
//! test or a one-off adapter needs:
//!
//! ```
//! use seqwindow::traits::{decode_fn, fetch_fn, RecordDecoder, WindowFetcher};
//!
//! let rows = vec![(1u32, "1"), (2, "2"), (3, "3")];
//! let fetcher = fetch_fn(move |start: &u32, max: usize| {
//!     Ok::<_, std::io::Error>(
//!         rows.iter().filter(|(k, _)| k >= start).take(max).copied().collect::<Vec<_>>(),
//!     )
//! });
//! let decoder = decode_fn(|raw: &str| raw.parse::<u64>());
//!
//! let fetched = fetcher.fetch(&2, 10).unwrap();
//! assert_eq!(fetched, vec![(2, "2"), (3, "3")]);
//! assert_eq!(decoder.decode("3").unwrap(), 3);
//! ```

use std::rc::Rc;
use std::sync::Arc;

/// Loads up to `max_count` ordered `(key, raw record)` pairs starting at a key.
///
/// Resource acquisition and release for the call (connections, statements,
/// cursors) belong entirely to the implementation.
pub trait WindowFetcher<K> {
    /// Undecoded record as produced by the backing store.
    type Raw;
    /// Failure of the backing call itself.
    type Error;

    /// Fetches the window starting at `start`.
    ///
    /// When the store contains `start`, the first entry's key equals it;
    /// otherwise the entries are whatever the store orders at or after
    /// `start`. Returns an empty `Vec` when nothing qualifies.
    fn fetch(&self, start: &K, max_count: usize) -> Result<Vec<(K, Self::Raw)>, Self::Error>;
}

/// Converts one raw record into a domain value.
pub trait RecordDecoder<R> {
    /// Decoded domain value held in the window.
    type Value;
    /// Schema mismatch or otherwise unusable record.
    type Error;

    fn decode(&self, raw: R) -> Result<Self::Value, Self::Error>;
}

// ---------------------------------------------------------------------------
// Wrappers
// ---------------------------------------------------------------------------

impl<K, T> WindowFetcher<K> for &T
where
    T: WindowFetcher<K> + ?Sized,
{
    type Raw = T::Raw;
    type Error = T::Error;

    #[inline]
    fn fetch(&self, start: &K, max_count: usize) -> Result<Vec<(K, Self::Raw)>, Self::Error> {
        (**self).fetch(start, max_count)
    }
}

impl<K, T> WindowFetcher<K> for Arc<T>
where
    T: WindowFetcher<K> + ?Sized,
{
    type Raw = T::Raw;
    type Error = T::Error;

    #[inline]
    fn fetch(&self, start: &K, max_count: usize) -> Result<Vec<(K, Self::Raw)>, Self::Error> {
        (**self).fetch(start, max_count)
    }
}

impl<K, T> WindowFetcher<K> for Rc<T>
where
    T: WindowFetcher<K> + ?Sized,
{
    type Raw = T::Raw;
    type Error = T::Error;

    #[inline]
    fn fetch(&self, start: &K, max_count: usize) -> Result<Vec<(K, Self::Raw)>, Self::Error> {
        (**self).fetch(start, max_count)
    }
}

impl<R, T> RecordDecoder<R> for &T
where
    T: RecordDecoder<R> + ?Sized,
{
    type Value = T::Value;
    type Error = T::Error;

    #[inline]
    fn decode(&self, raw: R) -> Result<Self::Value, Self::Error> {
        (**self).decode(raw)
    }
}

impl<R, T> RecordDecoder<R> for Arc<T>
where
    T: RecordDecoder<R> + ?Sized,
{
    type Value = T::Value;
    type Error = T::Error;

    #[inline]
    fn decode(&self, raw: R) -> Result<Self::Value, Self::Error> {
        (**self).decode(raw)
    }
}

impl<R, T> RecordDecoder<R> for Rc<T>
where
    T: RecordDecoder<R> + ?Sized,
{
    type Value = T::Value;
    type Error = T::Error;

    #[inline]
    fn decode(&self, raw: R) -> Result<Self::Value, Self::Error> {
        (**self).decode(raw)
    }
}

// ---------------------------------------------------------------------------
// Closure adapters
// ---------------------------------------------------------------------------

/// [`WindowFetcher`] backed by a closure. Created by [`fetch_fn`].
#[derive(Clone, Copy)]
pub struct FetchFn<F> {
    f: F,
}

/// Wraps `Fn(&K, usize) -> Result<Vec<(K, R)>, E>` as a [`WindowFetcher`].
#[inline]
pub fn fetch_fn<F>(f: F) -> FetchFn<F> {
    FetchFn { f }
}

impl<K, R, E, F> WindowFetcher<K> for FetchFn<F>
where
    F: Fn(&K, usize) -> Result<Vec<(K, R)>, E>,
{
    type Raw = R;
    type Error = E;

    #[inline]
    fn fetch(&self, start: &K, max_count: usize) -> Result<Vec<(K, R)>, E> {
        (self.f)(start, max_count)
    }
}

impl<F> std::fmt::Debug for FetchFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchFn").finish_non_exhaustive()
    }
}

/// [`RecordDecoder`] backed by a closure. Created by [`decode_fn`].
#[derive(Clone, Copy)]
pub struct DecodeFn<F> {
    f: F,
}

/// Wraps `Fn(R) -> Result<V, E>` as a [`RecordDecoder`].
#[inline]
pub fn decode_fn<F>(f: F) -> DecodeFn<F> {
    DecodeFn { f }
}

impl<R, V, E, F> RecordDecoder<R> for DecodeFn<F>
where
    F: Fn(R) -> Result<V, E>,
{
    type Value = V;
    type Error = E;

    #[inline]
    fn decode(&self, raw: R) -> Result<V, E> {
        (self.f)(raw)
    }
}

impl<F> std::fmt::Debug for DecodeFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodeFn").finish_non_exhaustive()
    }
}

/// Decoder that passes raw records through unchanged.
///
/// Useful when the fetcher already yields domain values.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityDecoder;

impl<R> RecordDecoder<R> for IdentityDecoder {
    type Value = R;
    type Error = std::convert::Infallible;

    #[inline]
    fn decode(&self, raw: R) -> Result<R, Self::Error> {
        Ok(raw)
    }
}
