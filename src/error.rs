//! Error types for the seqwindow library.
//!
//! ## Key Components
//!
//! - [`InvariantError`]: Returned when internal data-structure invariants are
//!   violated (`check_invariants` methods).
//! - [`ConfigError`]: Returned when cache configuration parameters are invalid
//!   (zero batch size).
//! - [`WindowError`]: Returned by
//!   [`SequentialWindowCache::get`](crate::cache::SequentialWindowCache::get)
//!   when a key has no record, or when one of the collaborators fails.
//!
//! ## Example Usage
//!
//! ```
//! use seqwindow::builder::WindowConfig;
//! use seqwindow::error::ConfigError;
//!
//! // Fallible constructor for user-configurable parameters
//! let config: Result<WindowConfig, ConfigError> = WindowConfig::try_new(64);
//! assert!(config.is_ok());
//!
//! // Zero batch size is caught without panicking
//! let bad = WindowConfig::try_new(0);
//! assert!(bad.is_err());
//! ```

use thiserror::Error;

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal cache invariants are violated.
///
/// Produced by `check_invariants` methods on
/// [`Window`](crate::window::Window) and
/// [`SequentialWindowCache`](crate::cache::SequentialWindowCache).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when cache configuration parameters are invalid.
///
/// Produced by [`WindowConfig::try_new`](crate::builder::WindowConfig::try_new)
/// and [`WindowCacheBuilder::try_build`](crate::builder::WindowCacheBuilder::try_build).
/// Carries a human-readable description of which parameter failed validation.
///
/// # Example
///
/// ```
/// use seqwindow::builder::WindowConfig;
///
/// let err = WindowConfig::try_new(0).unwrap_err();
/// assert!(err.to_string().contains("batch_size"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// WindowError
// ---------------------------------------------------------------------------

/// Failure of a single window lookup.
///
/// `F` is the fetcher's error type and `D` the decoder's. Neither failure
/// variant touches the cache: the window that was current before the call
/// stays current, so the same key can be retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError<F, D> {
    /// The backing store has no record for the key.
    #[error("no record found for key")]
    NotFound,
    /// The backing fetch failed.
    #[error("window fetch failed")]
    Fetch(#[source] F),
    /// A fetched record could not be decoded.
    #[error("record decode failed")]
    Decode(#[source] D),
}

impl<F, D> WindowError<F, D> {
    /// Returns `true` for [`WindowError::NotFound`].
    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, WindowError::NotFound)
    }

    /// Returns the fetch error, if this is a fetch failure.
    pub fn as_fetch(&self) -> Option<&F> {
        match self {
            WindowError::Fetch(err) => Some(err),
            _ => None,
        }
    }

    /// Returns the decode error, if this is a decode failure.
    pub fn as_decode(&self) -> Option<&D> {
        match self {
            WindowError::Decode(err) => Some(err),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[derive(Debug, Error, PartialEq)]
    #[error("connection refused")]
    struct Refused;

    #[derive(Debug, Error, PartialEq)]
    #[error("missing column stock_level")]
    struct MissingColumn;

    // -- InvariantError ---------------------------------------------------

    #[test]
    fn invariant_display_shows_message() {
        let err = InvariantError::new("window exceeds batch size");
        assert_eq!(err.to_string(), "window exceeds batch size");
        assert_eq!(err.message(), "window exceeds batch size");
    }

    // -- ConfigError ------------------------------------------------------

    #[test]
    fn config_display_shows_message() {
        let err = ConfigError::new("batch_size must be > 0");
        assert_eq!(err.to_string(), "batch_size must be > 0");
    }

    #[test]
    fn config_message_accessor() {
        let err = ConfigError::new("test");
        assert_eq!(err.message(), "test");
    }

    #[test]
    fn config_clone_and_eq() {
        let a = ConfigError::new("x");
        let b = a.clone();
        assert_eq!(a, b);
    }

    #[test]
    fn config_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<ConfigError>();
    }

    // -- WindowError ------------------------------------------------------

    #[test]
    fn not_found_has_no_source() {
        let err: WindowError<Refused, MissingColumn> = WindowError::NotFound;
        assert!(err.is_not_found());
        assert!(err.source().is_none());
        assert_eq!(err.to_string(), "no record found for key");
    }

    #[test]
    fn fetch_failure_exposes_source() {
        let err: WindowError<Refused, MissingColumn> = WindowError::Fetch(Refused);
        assert!(!err.is_not_found());
        assert_eq!(err.as_fetch(), Some(&Refused));
        assert_eq!(err.as_decode(), None);
        assert_eq!(err.source().map(|s| s.to_string()).as_deref(), Some("connection refused"));
    }

    #[test]
    fn decode_failure_exposes_source() {
        let err: WindowError<Refused, MissingColumn> = WindowError::Decode(MissingColumn);
        assert_eq!(err.as_decode(), Some(&MissingColumn));
        assert_eq!(err.as_fetch(), None);
        assert_eq!(
            err.source().map(|s| s.to_string()).as_deref(),
            Some("missing column stock_level")
        );
    }
}
