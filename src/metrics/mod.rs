//! Window cache metrics.
//!
//! Enabled by the `metrics` feature (on by default). Recording, snapshotting
//! and export are split into separate traits; see [`traits`].

pub mod cell;
pub mod exporter;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;
