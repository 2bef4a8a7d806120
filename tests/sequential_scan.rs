// ==============================================
// SEQUENTIAL SCAN TESTS (integration)
// ==============================================
//
// End-to-end scans over a scripted backing store: each known start key
// answers with a fixed window, anything else answers with nothing. Values
// are the last digit of the SKU id.

use std::cell::RefCell;
use std::collections::HashMap;

use seqwindow::cache::SequentialWindowCache;
use seqwindow::error::WindowError;
use seqwindow::traits::{decode_fn, DecodeFn, WindowFetcher};

#[derive(Default)]
struct ScriptedStore {
    windows: HashMap<&'static str, Vec<&'static str>>,
    starts: RefCell<Vec<String>>,
}

impl ScriptedStore {
    fn sku_fixture() -> Self {
        let mut windows = HashMap::new();
        windows.insert(
            "SKU0001-01",
            vec!["SKU0001-01", "SKU0001-02", "SKU0002-01", "SKU0002-02"],
        );
        windows.insert(
            "SKU0002-03",
            vec!["SKU0002-03", "SKU0003-03", "SKU0003-04", "SKU0004-01"],
        );
        windows.insert(
            "SKU0004-02",
            vec!["SKU0004-02", "SKU0004-03", "SKU0004-04", "SKU0004-05"],
        );
        Self {
            windows,
            starts: RefCell::new(Vec::new()),
        }
    }

    fn fetches(&self) -> usize {
        self.starts.borrow().len()
    }
}

impl WindowFetcher<String> for ScriptedStore {
    type Raw = &'static str;
    type Error = std::convert::Infallible;

    fn fetch(
        &self,
        start: &String,
        max_count: usize,
    ) -> Result<Vec<(String, &'static str)>, Self::Error> {
        self.starts.borrow_mut().push(start.clone());
        Ok(self
            .windows
            .get(start.as_str())
            .map(|ids| {
                ids.iter()
                    .take(max_count)
                    .map(|id| (id.to_string(), *id))
                    .collect()
            })
            .unwrap_or_default())
    }
}

fn last_digit(raw: &'static str) -> Result<u32, String> {
    raw.chars()
        .last()
        .and_then(|c| c.to_digit(10))
        .ok_or_else(|| format!("no trailing digit in {raw}"))
}

type DigitDecoder = DecodeFn<fn(&'static str) -> Result<u32, String>>;
type ScanCache<'a> = SequentialWindowCache<String, &'a ScriptedStore, DigitDecoder>;

fn new_cache(store: &ScriptedStore) -> ScanCache<'_> {
    let digit: fn(&'static str) -> Result<u32, String> = last_digit;
    SequentialWindowCache::new(4, store, decode_fn(digit))
}

fn get(
    cache: &mut ScanCache<'_>,
    id: &str,
) -> Result<u32, WindowError<std::convert::Infallible, String>> {
    cache.get(&id.to_string()).copied()
}

#[test]
fn forward_scan_fetches_once_per_window() {
    let store = ScriptedStore::sku_fixture();
    let mut cache = new_cache(&store);

    assert_eq!(get(&mut cache, "SKU0001-01"), Ok(1));
    assert_eq!(get(&mut cache, "SKU0001-02"), Ok(2));
    assert_eq!(get(&mut cache, "SKU0002-01"), Ok(1));
    assert_eq!(get(&mut cache, "SKU0002-02"), Ok(2));
    assert_eq!(store.fetches(), 1);

    assert_eq!(get(&mut cache, "SKU0002-03"), Ok(3));
    assert_eq!(store.fetches(), 2);
    assert_eq!(get(&mut cache, "SKU0003-03"), Ok(3));
    assert_eq!(get(&mut cache, "SKU0003-04"), Ok(4));
    assert_eq!(get(&mut cache, "SKU0004-01"), Ok(1));
    assert_eq!(store.fetches(), 2);

    assert_eq!(get(&mut cache, "SKU0004-02"), Ok(2));
    assert_eq!(get(&mut cache, "SKU0004-03"), Ok(3));
    assert_eq!(get(&mut cache, "SKU0004-04"), Ok(4));
    assert_eq!(get(&mut cache, "SKU0004-05"), Ok(5));
    assert_eq!(store.fetches(), 3);
}

#[test]
fn back_and_forth_refetches_evicted_windows() {
    let store = ScriptedStore::sku_fixture();
    let mut cache = new_cache(&store);

    for (id, expected) in [
        ("SKU0001-01", 1),
        ("SKU0001-02", 2),
        ("SKU0002-01", 1),
        ("SKU0002-02", 2),
        ("SKU0002-03", 3),
        ("SKU0003-03", 3),
        ("SKU0003-04", 4),
        ("SKU0004-01", 1),
        ("SKU0004-02", 2),
        ("SKU0004-03", 3),
        ("SKU0004-04", 4),
        ("SKU0004-05", 5),
    ] {
        assert_eq!(get(&mut cache, id), Ok(expected), "lookup of {id}");
    }
    assert_eq!(store.fetches(), 3);

    assert_eq!(get(&mut cache, "SKU0001-01"), Ok(1));
    assert_eq!(get(&mut cache, "SKU0004-02"), Ok(2));
    assert_eq!(get(&mut cache, "SKU0002-03"), Ok(3));
    assert_eq!(store.fetches(), 6);
    assert_eq!(
        *store.starts.borrow(),
        vec![
            "SKU0001-01",
            "SKU0002-03",
            "SKU0004-02",
            "SKU0001-01",
            "SKU0004-02",
            "SKU0002-03"
        ]
    );
}

#[test]
fn unknown_key_is_not_found_after_one_fetch() {
    let store = ScriptedStore::sku_fixture();
    let mut cache = new_cache(&store);

    assert_eq!(get(&mut cache, "SKU0006-05"), Err(WindowError::NotFound));
    assert_eq!(store.fetches(), 1);
    assert!(cache.is_loaded());
    assert_eq!(cache.window_len(), 0);

    // no negative caching
    assert_eq!(get(&mut cache, "SKU0006-05"), Err(WindowError::NotFound));
    assert_eq!(store.fetches(), 2);
}

#[test]
fn revisit_within_current_window_is_free() {
    let store = ScriptedStore::sku_fixture();
    let mut cache = new_cache(&store);

    get(&mut cache, "SKU0002-03").unwrap();
    get(&mut cache, "SKU0004-01").unwrap();
    get(&mut cache, "SKU0002-03").unwrap();
    get(&mut cache, "SKU0003-04").unwrap();
    assert_eq!(store.fetches(), 1);
}

#[cfg(feature = "metrics")]
#[test]
fn hit_ratio_of_full_scan() {
    use seqwindow::metrics::traits::MetricsSnapshotProvider;

    let store = ScriptedStore::sku_fixture();
    let mut cache = new_cache(&store);
    for id in [
        "SKU0001-01",
        "SKU0001-02",
        "SKU0002-01",
        "SKU0002-02",
        "SKU0002-03",
        "SKU0003-03",
        "SKU0003-04",
        "SKU0004-01",
    ] {
        get(&mut cache, id).unwrap();
    }
    let snap = cache.snapshot();
    assert_eq!(snap.get_calls, 8);
    assert_eq!(snap.fetch_calls, 2);
    assert!((snap.hit_ratio() - 0.75).abs() < f64::EPSILON);
}
