//! Construction of window caches.
//!
//! Provides [`WindowConfig`] (the batch size), a [`WindowCacheBuilder`] that
//! binds the two collaborators once at startup, and a [`WindowCacheFactory`]
//! that hands each scanning context its own private cache.
//!
//! ## Example
//!
//! ```rust
//! use seqwindow::builder::WindowCacheBuilder;
//! use seqwindow::traits::{fetch_fn, IdentityDecoder};
//!
//! let fetcher = fetch_fn(|start: &u64, max: usize| {
//!     Ok::<_, std::io::Error>((*start..).take(max).map(|k| (k, k * 2)).collect::<Vec<_>>())
//! });
//!
//! let mut cache = WindowCacheBuilder::new(100)
//!     .fetcher(fetcher)
//!     .decoder(IdentityDecoder)
//!     .try_build()
//!     .unwrap();
//! assert_eq!(cache.get(&21).unwrap(), &42);
//! ```

use std::hash::Hash;
use std::sync::Arc;

use crate::cache::SequentialWindowCache;
use crate::error::ConfigError;
use crate::traits::{RecordDecoder, WindowFetcher};

/// Entries fetched per miss when no batch size is given.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Configuration fixed for a cache's lifetime.
///
/// # Fields
///
/// | Field        | Type    | Default | Description                 |
/// |--------------|---------|---------|-----------------------------|
/// | `batch_size` | `usize` | 1000    | Entries loaded per fetch    |
///
/// # Example
///
/// ```
/// use seqwindow::builder::WindowConfig;
///
/// let config = WindowConfig::default();
/// assert_eq!(config.batch_size(), 1000);
///
/// // Zero is clamped by the infallible constructor...
/// assert_eq!(WindowConfig::new(0).batch_size(), 1);
/// // ...and rejected by the fallible one.
/// assert!(WindowConfig::try_new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    batch_size: usize,
}

impl WindowConfig {
    /// Creates a configuration, clamping `batch_size` to at least 1.
    #[inline]
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    /// Creates a configuration, rejecting a zero `batch_size`.
    pub fn try_new(batch_size: usize) -> Result<Self, ConfigError> {
        if batch_size == 0 {
            return Err(ConfigError::new("batch_size must be greater than zero"));
        }
        Ok(Self { batch_size })
    }

    #[inline]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Builder for a single [`SequentialWindowCache`].
///
/// The fetcher and decoder are bound through [`fetcher`](Self::fetcher) and
/// [`decoder`](Self::decoder); a builder missing either one does not
/// produce a cache.
#[derive(Debug, Clone)]
pub struct WindowCacheBuilder<F = (), D = ()> {
    batch_size: usize,
    fetcher: F,
    decoder: D,
}

impl WindowCacheBuilder {
    /// Starts a builder with the given batch size.
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size,
            fetcher: (),
            decoder: (),
        }
    }

    /// Starts a builder from a validated [`WindowConfig`].
    pub fn from_config(config: WindowConfig) -> Self {
        Self::new(config.batch_size())
    }
}

impl Default for WindowCacheBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

impl<F, D> WindowCacheBuilder<F, D> {
    /// Binds the backing store fetcher.
    pub fn fetcher<F2>(self, fetcher: F2) -> WindowCacheBuilder<F2, D> {
        WindowCacheBuilder {
            batch_size: self.batch_size,
            fetcher,
            decoder: self.decoder,
        }
    }

    /// Binds the record decoder.
    pub fn decoder<D2>(self, decoder: D2) -> WindowCacheBuilder<F, D2> {
        WindowCacheBuilder {
            batch_size: self.batch_size,
            fetcher: self.fetcher,
            decoder,
        }
    }

    /// Replaces the batch size.
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Builds the cache, clamping a zero batch size to 1.
    pub fn build<K>(self) -> SequentialWindowCache<K, F, D>
    where
        K: Eq + Hash + Clone,
        F: WindowFetcher<K>,
        D: RecordDecoder<F::Raw>,
    {
        SequentialWindowCache::new(self.batch_size, self.fetcher, self.decoder)
    }

    /// Builds the cache, rejecting a zero batch size.
    pub fn try_build<K>(self) -> Result<SequentialWindowCache<K, F, D>, ConfigError>
    where
        K: Eq + Hash + Clone,
        F: WindowFetcher<K>,
        D: RecordDecoder<F::Raw>,
    {
        let config = WindowConfig::try_new(self.batch_size)?;
        Ok(SequentialWindowCache::new(
            config.batch_size(),
            self.fetcher,
            self.decoder,
        ))
    }

    /// Turns the builder into a factory for per-scan caches.
    pub fn try_into_factory(self) -> Result<WindowCacheFactory<F, D>, ConfigError> {
        let config = WindowConfig::try_new(self.batch_size)?;
        Ok(WindowCacheFactory::new(config, self.fetcher, self.decoder))
    }
}

/// Hands out one private cache per scanning context.
///
/// The collaborators are shared behind `Arc`; the windows are not. Clone the
/// factory (or share it by reference) across worker threads and call
/// [`create`](Self::create) at the start of each scan.
///
/// # Example
///
/// ```
/// use std::thread;
///
/// use seqwindow::builder::{WindowCacheFactory, WindowConfig};
/// use seqwindow::traits::{fetch_fn, IdentityDecoder};
///
/// let fetcher = fetch_fn(|start: &u32, max: usize| {
///     Ok::<_, std::io::Error>((*start..).take(max).map(|k| (k, k)).collect::<Vec<_>>())
/// });
/// let factory = WindowCacheFactory::new(WindowConfig::new(16), fetcher, IdentityDecoder);
///
/// thread::scope(|s| {
///     for partition in 0..4u32 {
///         let factory = &factory;
///         s.spawn(move || {
///             let mut cache = factory.create();
///             for key in partition * 100..partition * 100 + 50 {
///                 assert_eq!(cache.get(&key).unwrap(), &key);
///             }
///         });
///     }
/// });
/// ```
#[derive(Debug)]
pub struct WindowCacheFactory<F, D> {
    config: WindowConfig,
    fetcher: Arc<F>,
    decoder: Arc<D>,
}

impl<F, D> WindowCacheFactory<F, D> {
    pub fn new(config: WindowConfig, fetcher: F, decoder: D) -> Self {
        Self::from_shared(config, Arc::new(fetcher), Arc::new(decoder))
    }

    /// Creates a factory over collaborators that are already shared.
    pub fn from_shared(config: WindowConfig, fetcher: Arc<F>, decoder: Arc<D>) -> Self {
        Self {
            config,
            fetcher,
            decoder,
        }
    }

    /// Creates a new, empty cache for one scan.
    pub fn create<K>(&self) -> SequentialWindowCache<K, Arc<F>, Arc<D>>
    where
        K: Eq + Hash + Clone,
        F: WindowFetcher<K>,
        D: RecordDecoder<F::Raw>,
    {
        SequentialWindowCache::new(
            self.config.batch_size(),
            Arc::clone(&self.fetcher),
            Arc::clone(&self.decoder),
        )
    }

    #[inline]
    pub fn config(&self) -> WindowConfig {
        self.config
    }

    #[inline]
    pub fn fetcher(&self) -> &Arc<F> {
        &self.fetcher
    }

    #[inline]
    pub fn decoder(&self) -> &Arc<D> {
        &self.decoder
    }
}

impl<F, D> Clone for WindowCacheFactory<F, D> {
    fn clone(&self) -> Self {
        Self {
            config: self.config,
            fetcher: Arc::clone(&self.fetcher),
            decoder: Arc::clone(&self.decoder),
        }
    }
}
