//! Stock-level lookups for catalog feeds.
//!
//! A feed walks the catalog in SKU order and asks for each SKU's stock,
//! backorder level and availability status. [`SequentialInventory`] answers
//! those questions from a [`SequentialWindowCache`] keyed by SKU id, so a
//! full feed run costs roughly `skus / batch_size` queries instead of one per
//! SKU.
//!
//! ## Key normalization
//!
//! Feeds may ask for locale-qualified ids such as `"SKU0001-01:en_US"`.
//! Stock is stored once per SKU, so everything from the last
//! [`LOCALE_SEPARATOR`] on is stripped before the cache is consulted:
//!
//! ```
//! use seqwindow::inventory::normalize_sku;
//!
//! assert_eq!(normalize_sku("SKU0001-01:en_US"), "SKU0001-01");
//! assert_eq!(normalize_sku("SKU0001-01"), "SKU0001-01");
//! ```
//!
//! ## Rows
//!
//! The backing query yields [`InventoryRow`]s with the columns
//! [`COLUMN_ID`], [`COLUMN_STOCK_LEVEL`], [`COLUMN_BACKORDER_LEVEL`] and
//! [`COLUMN_AVAIL_STATUS`]. [`InventoryDecoder`] turns each into an
//! [`InventoryEntry`]. A `NULL` level reads as 0; a missing or non-integer
//! column fails the decode.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::debug;

use crate::builder::WindowConfig;
use crate::cache::SequentialWindowCache;
use crate::error::WindowError;
use crate::traits::{RecordDecoder, WindowFetcher};

/// Separates a SKU id from its locale suffix.
pub const LOCALE_SEPARATOR: char = ':';

pub const DEFAULT_INVENTORY_NAME: &str = "In Memory Inventory";

pub const COLUMN_ID: &str = "catalog_ref_id";
pub const COLUMN_STOCK_LEVEL: &str = "stock_level";
pub const COLUMN_BACKORDER_LEVEL: &str = "backorder_level";
pub const COLUMN_AVAIL_STATUS: &str = "avail_status";

/// Strips the locale suffix from a SKU id.
#[inline]
pub fn normalize_sku(id: &str) -> &str {
    match id.rfind(LOCALE_SEPARATOR) {
        Some(idx) => &id[..idx],
        None => id,
    }
}

/// Inventory levels for one SKU.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InventoryEntry {
    pub stock_level: i64,
    pub backorder_level: i64,
    pub availability_status: i32,
}

// ---------------------------------------------------------------------------
// Raw rows
// ---------------------------------------------------------------------------

/// A single column value as returned by the backing query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    Null,
    Int(i64),
    Text(String),
}

/// One undecoded row of the inventory query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryRow {
    columns: FxHashMap<String, Column>,
}

impl InventoryRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor for a complete, well-formed row.
    pub fn from_levels(id: impl Into<String>, entry: InventoryEntry) -> Self {
        Self::new()
            .with(COLUMN_ID, Column::Text(id.into()))
            .with(COLUMN_STOCK_LEVEL, Column::Int(entry.stock_level))
            .with(COLUMN_BACKORDER_LEVEL, Column::Int(entry.backorder_level))
            .with(
                COLUMN_AVAIL_STATUS,
                Column::Int(i64::from(entry.availability_status)),
            )
    }

    /// Sets a column, replacing any previous value.
    pub fn with(mut self, name: impl Into<String>, value: Column) -> Self {
        self.columns.insert(name.into(), value);
        self
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    /// The row's SKU id, if the id column is present and textual.
    pub fn id(&self) -> Option<&str> {
        match self.columns.get(COLUMN_ID) {
            Some(Column::Text(id)) => Some(id),
            _ => None,
        }
    }

    fn int(&self, name: &str) -> Result<i64, RowDecodeError> {
        match self.columns.get(name) {
            Some(Column::Int(value)) => Ok(*value),
            Some(Column::Null) => Ok(0),
            Some(Column::Text(_)) => Err(RowDecodeError::NotAnInteger {
                column: name.to_string(),
            }),
            None => Err(RowDecodeError::MissingColumn(name.to_string())),
        }
    }
}

/// A row that does not match the inventory schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowDecodeError {
    #[error("missing column `{0}`")]
    MissingColumn(String),
    #[error("column `{column}` is not an integer")]
    NotAnInteger { column: String },
    #[error("column `{column}` value {value} is out of range")]
    OutOfRange { column: String, value: i64 },
}

/// Decodes [`InventoryRow`]s into [`InventoryEntry`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct InventoryDecoder;

impl RecordDecoder<InventoryRow> for InventoryDecoder {
    type Value = InventoryEntry;
    type Error = RowDecodeError;

    fn decode(&self, row: InventoryRow) -> Result<InventoryEntry, RowDecodeError> {
        let status = row.int(COLUMN_AVAIL_STATUS)?;
        let availability_status =
            i32::try_from(status).map_err(|_| RowDecodeError::OutOfRange {
                column: COLUMN_AVAIL_STATUS.to_string(),
                value: status,
            })?;

        Ok(InventoryEntry {
            stock_level: row.int(COLUMN_STOCK_LEVEL)?,
            backorder_level: row.int(COLUMN_BACKORDER_LEVEL)?,
            availability_status,
        })
    }
}

// ---------------------------------------------------------------------------
// In-memory table
// ---------------------------------------------------------------------------

/// Sorted in-memory inventory table.
///
/// Implements [`WindowFetcher`] the way the SQL query does: rows with id at
/// or after the start key, in id order, at most `max_count` of them. Counts
/// the queries it serves, so it doubles as a test and demo backend.
#[derive(Debug, Default)]
pub struct InventoryTable {
    rows: BTreeMap<String, InventoryRow>,
    queries: AtomicUsize,
}

impl InventoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the row for `id`.
    pub fn insert(&mut self, id: impl Into<String>, entry: InventoryEntry) {
        let id = id.into();
        let row = InventoryRow::from_levels(id.clone(), entry);
        self.rows.insert(id, row);
    }

    /// Inserts a raw row under `id`, well formed or not.
    pub fn insert_row(&mut self, id: impl Into<String>, row: InventoryRow) {
        self.rows.insert(id.into(), row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of fetches served so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::Relaxed)
    }
}

impl FromIterator<(String, InventoryEntry)> for InventoryTable {
    fn from_iter<I: IntoIterator<Item = (String, InventoryEntry)>>(iter: I) -> Self {
        let mut table = InventoryTable::new();
        for (id, entry) in iter {
            table.insert(id, entry);
        }
        table
    }
}

impl WindowFetcher<String> for InventoryTable {
    type Raw = InventoryRow;
    type Error = std::convert::Infallible;

    fn fetch(
        &self,
        start: &String,
        max_count: usize,
    ) -> Result<Vec<(String, InventoryRow)>, Self::Error> {
        self.queries.fetch_add(1, Ordering::Relaxed);
        Ok(self
            .rows
            .range(start.clone()..)
            .take(max_count)
            .map(|(id, row)| (id.clone(), row.clone()))
            .collect())
    }
}

// ---------------------------------------------------------------------------
// SequentialInventory
// ---------------------------------------------------------------------------

/// Inventory lookup failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError<E> {
    /// No inventory row exists for the SKU.
    #[error("inventory not found for {sku} in range {range}")]
    NotFound { sku: String, range: String },
    /// The backing query or row decoding failed.
    #[error("inventory lookup for {sku} failed")]
    Backend {
        sku: String,
        #[source]
        source: WindowError<E, RowDecodeError>,
    },
}

impl<E> InventoryError<E> {
    pub fn sku(&self) -> &str {
        match self {
            InventoryError::NotFound { sku, .. } | InventoryError::Backend { sku, .. } => sku,
        }
    }

    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, InventoryError::NotFound { .. })
    }
}

/// Read-only inventory manager for ordered catalog scans.
///
/// Not meant to be shared between concurrent feed partitions: give each
/// partition its own instance over a shared fetcher.
///
/// # Example
///
/// ```
/// use seqwindow::inventory::{InventoryEntry, InventoryTable, SequentialInventory};
///
/// let mut table = InventoryTable::new();
/// table.insert("SKU0001-01", InventoryEntry { stock_level: 5, ..Default::default() });
/// table.insert("SKU0001-02", InventoryEntry { stock_level: 0, ..Default::default() });
///
/// let mut inventory = SequentialInventory::new(100, &table);
/// assert_eq!(inventory.query_stock_level("SKU0001-01:en_US").unwrap(), 5);
/// assert_eq!(inventory.query_stock_level("SKU0001-02").unwrap(), 0);
/// assert!(inventory.query_stock_level("SKU9999-99").unwrap_err().is_not_found());
/// assert_eq!(table.query_count(), 2);
/// ```
pub struct SequentialInventory<F>
where
    F: WindowFetcher<String, Raw = InventoryRow>,
{
    name: String,
    cache: SequentialWindowCache<String, F, InventoryDecoder>,
}

impl<F> SequentialInventory<F>
where
    F: WindowFetcher<String, Raw = InventoryRow>,
{
    /// Creates an inventory loading `batch_size` SKUs per query.
    pub fn new(batch_size: usize, fetcher: F) -> Self {
        Self::from_cache(SequentialWindowCache::new(
            batch_size,
            fetcher,
            InventoryDecoder,
        ))
    }

    pub fn with_config(config: WindowConfig, fetcher: F) -> Self {
        Self::new(config.batch_size(), fetcher)
    }

    /// Wraps an existing cache.
    pub fn from_cache(cache: SequentialWindowCache<String, F, InventoryDecoder>) -> Self {
        Self {
            name: DEFAULT_INVENTORY_NAME.to_string(),
            cache,
        }
    }

    /// Renames the inventory.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn inventory_name(&self) -> &str {
        &self.name
    }

    pub fn cache(&self) -> &SequentialWindowCache<String, F, InventoryDecoder> {
        &self.cache
    }

    pub fn into_cache(self) -> SequentialWindowCache<String, F, InventoryDecoder> {
        self.cache
    }

    /// Looks up all levels for a SKU id (locale suffix allowed).
    pub fn query_entry(&mut self, id: &str) -> Result<InventoryEntry, InventoryError<F::Error>> {
        let sku = normalize_sku(id);
        let key = sku.to_string();
        let loads = !self.cache.contains(&key);

        let result = self.cache.get(&key).copied();
        if loads && !matches!(result, Err(WindowError::Fetch(_) | WindowError::Decode(_))) {
            debug!(
                sku,
                batch_size = self.cache.batch_size(),
                loaded = self.cache.window_len(),
                range = %self.window_range(),
                "loaded inventory window"
            );
        }

        match result {
            Ok(entry) => Ok(entry),
            Err(WindowError::NotFound) => {
                let range = self.window_range();
                debug!(sku, %range, "inventory not found");
                Err(InventoryError::NotFound { sku: key, range })
            },
            Err(source) => Err(InventoryError::Backend { sku: key, source }),
        }
    }

    pub fn query_stock_level(&mut self, id: &str) -> Result<i64, InventoryError<F::Error>> {
        let entry = self.query_entry(id)?;
        debug!(sku = normalize_sku(id), stock_level = entry.stock_level, "stock level");
        Ok(entry.stock_level)
    }

    pub fn query_backorder_level(&mut self, id: &str) -> Result<i64, InventoryError<F::Error>> {
        let entry = self.query_entry(id)?;
        debug!(
            sku = normalize_sku(id),
            backorder_level = entry.backorder_level,
            "backorder level"
        );
        Ok(entry.backorder_level)
    }

    pub fn query_availability_status(
        &mut self,
        id: &str,
    ) -> Result<i32, InventoryError<F::Error>> {
        let entry = self.query_entry(id)?;
        debug!(
            sku = normalize_sku(id),
            availability_status = entry.availability_status,
            "availability status"
        );
        Ok(entry.availability_status)
    }

    fn window_range(&self) -> String {
        match self.cache.window() {
            Some(window) => match (window.first_key(), window.last_key()) {
                (Some(first), Some(last)) => format!("{first} - {last}"),
                _ => "<empty>".to_string(),
            },
            None => "<empty>".to_string(),
        }
    }
}

impl<F> fmt::Debug for SequentialInventory<F>
where
    F: WindowFetcher<String, Raw = InventoryRow>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequentialInventory")
            .field("name", &self.name)
            .field("cache", &self.cache)
            .finish()
    }
}
