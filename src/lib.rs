//! seqwindow: a single-window read-ahead cache for ordered, paginated
//! backing stores.
//!
//! Callers that walk a store mostly in ascending key order (a catalog feed
//! checking each SKU's stock, say) pay one backing round trip per
//! `batch_size` lookups instead of one per lookup. See [`cache`] for the
//! state machine and [`traits`] for the collaborator contracts.

pub mod builder;
pub mod cache;
pub mod error;
pub mod inventory;
pub mod traits;
pub mod window;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;
