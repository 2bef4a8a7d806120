#![no_main]

use std::cell::Cell;
use std::collections::BTreeMap;

use libfuzzer_sys::fuzz_target;
use seqwindow::cache::SequentialWindowCache;
use seqwindow::error::WindowError;
use seqwindow::traits::{decode_fn, WindowFetcher};

// Fuzz arbitrary lookup sequences against a sorted store.
//
// The first byte picks the batch size, the next 32 bytes decide which keys
// exist. Remaining byte pairs are operations: get, peek, or a get while the
// store is set to fail. Every answer is checked against the store itself.

struct FlakyStore {
    rows: BTreeMap<u8, u8>,
    fail: Cell<bool>,
    fetches: Cell<usize>,
}

impl WindowFetcher<u8> for FlakyStore {
    type Raw = u8;
    type Error = ();

    fn fetch(&self, start: &u8, max_count: usize) -> Result<Vec<(u8, u8)>, ()> {
        self.fetches.set(self.fetches.get() + 1);
        if self.fail.get() {
            return Err(());
        }
        Ok(self
            .rows
            .range(*start..)
            .take(max_count)
            .map(|(k, v)| (*k, *v))
            .collect())
    }
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 33 {
        return;
    }

    let batch_size = usize::from(data[0] % 32);
    let mut rows = BTreeMap::new();
    for (i, bits) in data[1..33].iter().enumerate() {
        for bit in 0..8u8 {
            if bits & (1 << bit) != 0 {
                let key = (i as u8) * 8 + bit;
                rows.insert(key, key.wrapping_mul(7));
            }
        }
    }
    let store = FlakyStore {
        rows,
        fail: Cell::new(false),
        fetches: Cell::new(0),
    };
    // odd values fail to decode
    let mut cache = SequentialWindowCache::new(
        batch_size,
        &store,
        decode_fn(|raw: u8| if raw % 2 == 0 { Ok(raw) } else { Err(raw) }),
    );

    let mut idx = 33;
    while idx + 1 < data.len() {
        let op = data[idx] % 3;
        let key = data[idx + 1];
        idx += 2;

        match op {
            0 => {
                // get
                let hit = cache.contains(&key);
                let before = store.fetches.get();
                let result = cache.get(&key).copied();
                let fetched = store.fetches.get() - before;
                assert_eq!(fetched, usize::from(!hit));

                match (store.rows.get(&key), result) {
                    (Some(&v), Ok(got)) => assert_eq!(got, v),
                    (Some(_), Err(WindowError::Decode(_))) => {}
                    (None, Err(WindowError::NotFound)) => {}
                    (None, Err(WindowError::Decode(_))) => {}
                    (expected, got) => panic!("key {key}: store has {expected:?}, cache gave {got:?}"),
                }
            }
            1 => {
                // peek never fetches
                let before = store.fetches.get();
                if let Some(v) = cache.peek(&key) {
                    assert_eq!(store.rows.get(&key), Some(v));
                }
                assert_eq!(store.fetches.get(), before);
            }
            _ => {
                // failing get leaves the window alone
                let len = cache.window_len();
                let loaded = cache.is_loaded();
                let hit = cache.contains(&key);
                store.fail.set(true);
                let result = cache.get(&key).copied();
                store.fail.set(false);
                if !hit {
                    assert_eq!(result, Err(WindowError::Fetch(())));
                    assert_eq!(cache.window_len(), len);
                    assert_eq!(cache.is_loaded(), loaded);
                }
            }
        }

        assert!(cache.window_len() <= cache.batch_size());
        assert!(cache.check_invariants().is_ok());
    }
});
