//! Window cache benchmarks.
//!
//! Run with: `cargo bench --bench window`
//!
//! The backing store is an in-memory range, so these numbers measure cache
//! overhead (index build on a miss, hash lookup on a hit) rather than I/O.
//! Fetch counts per workload are printed once before measurement.

use std::cell::Cell;
use std::hint::black_box;
use std::time::Instant;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use seqwindow::cache::SequentialWindowCache;
use seqwindow::traits::{IdentityDecoder, WindowFetcher};

const UNIVERSE: u64 = 1_000_000;
const OPS: u64 = 100_000;

/// Dense key space `0..UNIVERSE`, value equals key.
#[derive(Default)]
struct RangeStore {
    fetches: Cell<u64>,
}

impl WindowFetcher<u64> for RangeStore {
    type Raw = u64;
    type Error = std::convert::Infallible;

    fn fetch(&self, start: &u64, max_count: usize) -> Result<Vec<(u64, u64)>, Self::Error> {
        self.fetches.set(self.fetches.get() + 1);
        Ok((*start..UNIVERSE).take(max_count).map(|k| (k, k)).collect())
    }
}

// ============================================================================
// Sequential scan (ns/op)
// ============================================================================

fn bench_sequential_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequential_scan_ns");
    group.throughput(Throughput::Elements(OPS));

    for batch in [16usize, 256, 1000, 4096] {
        group.bench_with_input(BenchmarkId::from_parameter(batch), &batch, |b, &batch| {
            b.iter_custom(|iters| {
                let store = RangeStore::default();
                let mut cache = SequentialWindowCache::new(batch, &store, IdentityDecoder);
                let start = Instant::now();
                for _ in 0..iters {
                    for key in 0..OPS {
                        black_box(cache.get(&key).ok());
                    }
                }
                start.elapsed()
            })
        });
    }
    group.finish();
}

// ============================================================================
// Strided scan: every `stride`-th key, so windows are partly wasted
// ============================================================================

fn bench_strided_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("strided_scan_ns");
    group.throughput(Throughput::Elements(OPS));

    for stride in [2u64, 8, 64] {
        group.bench_with_input(BenchmarkId::from_parameter(stride), &stride, |b, &stride| {
            b.iter_custom(|iters| {
                let store = RangeStore::default();
                let mut cache = SequentialWindowCache::new(1000, &store, IdentityDecoder);
                let start = Instant::now();
                for _ in 0..iters {
                    for i in 0..OPS {
                        black_box(cache.get(&((i * stride) % UNIVERSE)).ok());
                    }
                }
                start.elapsed()
            })
        });
    }
    group.finish();
}

// ============================================================================
// Random access: nearly every lookup is a miss
// ============================================================================

fn bench_random_access(c: &mut Criterion) {
    let mut group = c.benchmark_group("random_access_ns");
    group.throughput(Throughput::Elements(OPS / 10));

    for batch in [16usize, 256] {
        group.bench_with_input(BenchmarkId::from_parameter(batch), &batch, |b, &batch| {
            let mut rng = SmallRng::seed_from_u64(42);
            let keys: Vec<u64> = (0..OPS / 10)
                .map(|_| rng.random_range(0..UNIVERSE))
                .collect();
            b.iter_custom(|iters| {
                let store = RangeStore::default();
                let mut cache = SequentialWindowCache::new(batch, &store, IdentityDecoder);
                let start = Instant::now();
                for _ in 0..iters {
                    for key in &keys {
                        black_box(cache.get(key).ok());
                    }
                }
                start.elapsed()
            })
        });
    }
    group.finish();
}

// ============================================================================
// Fetch count report
// ============================================================================

fn report_fetch_counts(_c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(7);
    let workloads: [(&str, Vec<u64>); 3] = [
        ("sequential", (0..OPS).collect()),
        ("strided_8", (0..OPS).map(|i| i * 8).collect()),
        (
            "random",
            (0..OPS).map(|_| rng.random_range(0..UNIVERSE)).collect(),
        ),
    ];

    println!("\n{:<12} {:>8} {:>10}", "workload", "batch", "fetches");
    for (name, keys) in &workloads {
        for batch in [16usize, 1000] {
            let store = RangeStore::default();
            let mut cache = SequentialWindowCache::new(batch, &store, IdentityDecoder);
            for key in keys {
                let _ = cache.get(key);
            }
            println!("{:<12} {:>8} {:>10}", name, batch, store.fetches.get());
        }
    }
}

criterion_group!(
    benches,
    report_fetch_counts,
    bench_sequential_scan,
    bench_strided_scan,
    bench_random_access
);
criterion_main!(benches);
