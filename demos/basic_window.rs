use seqwindow::prelude::*;

fn main() {
    // Pretend backing store: ids 0..50, value is the id squared
    let fetcher = fetch_fn(|start: &u32, max: usize| {
        println!("fetching up to {max} rows from {start}");
        Ok::<_, std::io::Error>((*start..50).take(max).map(|k| (k, k * k)).collect::<Vec<_>>())
    });

    // Load 10 entries per round trip
    let mut cache = WindowCacheBuilder::new(10)
        .fetcher(fetcher)
        .decoder(IdentityDecoder)
        .try_build()
        .expect("batch size is non-zero");

    // Walk forward: one fetch per ten keys
    for id in 0..25u32 {
        let value = cache.get(&id).expect("id is in the store");
        println!("{id} -> {value}");
    }

    // Past the end of the store
    if let Err(err) = cache.get(&99) {
        println!("lookup of 99 failed: {err}");
    }

    #[cfg(feature = "metrics")]
    {
        use seqwindow::metrics::exporter::PrometheusTextExporter;
        use seqwindow::metrics::traits::MetricsExporter;

        let snapshot = cache.snapshot();
        println!("hit ratio: {:.2}", snapshot.hit_ratio());
        PrometheusTextExporter::new("seqwindow", std::io::stdout()).export(&snapshot);
    }
}
