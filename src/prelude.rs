pub use crate::builder::{WindowCacheBuilder, WindowCacheFactory, WindowConfig};
pub use crate::cache::{CacheState, SequentialWindowCache};
pub use crate::error::{ConfigError, WindowError};
pub use crate::inventory::{InventoryEntry, InventoryTable, SequentialInventory};
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::WindowMetricsSnapshot;
#[cfg(feature = "metrics")]
pub use crate::metrics::traits::MetricsSnapshotProvider;
pub use crate::traits::{decode_fn, fetch_fn, IdentityDecoder, RecordDecoder, WindowFetcher};
pub use crate::window::Window;
