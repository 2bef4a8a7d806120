//! Immutable batch of decoded entries from one fetch.
//!
//! A [`Window`] is built once from the result of a single
//! [`WindowFetcher::fetch`](crate::traits::WindowFetcher::fetch) and is never
//! mutated afterwards; the cache replaces it wholesale on the next miss.
//!
//! ## Layout
//!
//! ```text
//!   entries: Vec<(K, V)>          index: FxHashMap<K, usize>
//!   ┌──────────┬──────────┐       ┌──────────┬─────┐
//!   │ SKU01-01 │ v0       │ ◄──── │ SKU01-01 │  0  │
//!   │ SKU01-02 │ v1       │ ◄──── │ SKU01-02 │  1  │
//!   │ SKU02-01 │ v2       │ ◄──── │ SKU02-01 │  2  │
//!   └──────────┴──────────┘       └──────────┴─────┘
//!     fetch order                   O(1) average lookup
//! ```
//!
//! Entries keep the order the fetcher returned them in, so
//! [`first_key`](Window::first_key) and [`last_key`](Window::last_key)
//! describe the loaded key range without requiring `K: Ord`.

use std::hash::Hash;

use rustc_hash::FxHashMap;

/// Insertion-ordered, read-only mapping from key to value.
#[derive(Debug, Clone)]
pub struct Window<K, V> {
    entries: Vec<(K, V)>,
    index: FxHashMap<K, usize>,
}

impl<K, V> Window<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Builds a window from decoded entries in fetch order.
    ///
    /// A key that appears more than once keeps its first position and takes
    /// the value of its last occurrence.
    ///
    /// # Example
    ///
    /// ```
    /// use seqwindow::window::Window;
    ///
    /// let window = Window::from_entries(vec![("a", 1), ("b", 2), ("a", 3)]);
    /// assert_eq!(window.len(), 2);
    /// assert_eq!(window.get(&"a"), Some(&3));
    /// assert_eq!(window.first_key(), Some(&"a"));
    /// assert_eq!(window.last_key(), Some(&"b"));
    /// ```
    pub fn from_entries(entries: impl IntoIterator<Item = (K, V)>) -> Self {
        let iter = entries.into_iter();
        let (lower, _) = iter.size_hint();
        let mut ordered: Vec<(K, V)> = Vec::with_capacity(lower);
        let mut index = FxHashMap::with_capacity_and_hasher(lower, Default::default());

        for (key, value) in iter {
            match index.get(&key) {
                Some(&slot) => ordered[slot] = (key, value),
                None => {
                    index.insert(key.clone(), ordered.len());
                    ordered.push((key, value));
                },
            }
        }

        Self {
            entries: ordered,
            index,
        }
    }

    /// Returns the value for `key`, if this window holds it.
    #[inline]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.index.get(key).map(|&slot| &self.entries[slot].1)
    }

    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }
}

impl<K, V> Window<K, V> {
    /// Creates a window with no entries.
    ///
    /// This is what an empty fetch produces; it still counts as the current
    /// window.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Key of the first fetched entry.
    #[inline]
    pub fn first_key(&self) -> Option<&K> {
        self.entries.first().map(|(k, _)| k)
    }

    /// Key of the last fetched entry.
    #[inline]
    pub fn last_key(&self) -> Option<&K> {
        self.entries.last().map(|(k, _)| k)
    }

    /// Iterates entries in fetch order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Iterates keys in fetch order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Structural check: every entry is indexed at its own slot.
    pub fn check_invariants(&self) -> Result<(), crate::error::InvariantError>
    where
        K: Eq + Hash,
    {
        if self.index.len() != self.entries.len() {
            return Err(crate::error::InvariantError::new(format!(
                "index holds {} keys but window holds {} entries",
                self.index.len(),
                self.entries.len()
            )));
        }
        for (slot, (key, _)) in self.entries.iter().enumerate() {
            if self.index.get(key) != Some(&slot) {
                return Err(crate::error::InvariantError::new(format!(
                    "entry at slot {slot} is not indexed at its own position"
                )));
            }
        }
        Ok(())
    }
}

impl<K, V> Default for Window<K, V> {
    fn default() -> Self {
        Self::empty()
    }
}
