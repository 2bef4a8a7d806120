use std::sync::Arc;
use std::thread;

use seqwindow::inventory::{InventoryEntry, InventoryTable, SequentialInventory};

fn main() {
    // A small catalog: 20 products with 5 SKUs each
    let table: InventoryTable = (1..=20)
        .flat_map(|product| (1..=5).map(move |sku| (product, sku)))
        .map(|(product, sku)| {
            (
                format!("SKU{product:04}-{sku:02}"),
                InventoryEntry {
                    stock_level: (product * sku) % 7,
                    backorder_level: 0,
                    availability_status: 1000,
                },
            )
        })
        .collect();

    // Single feed: ids come with a locale suffix
    let mut inventory = SequentialInventory::new(25, &table).with_name("Demo Warehouse");
    let mut out_of_stock = 0;
    for product in 1..=20 {
        for sku in 1..=5 {
            let id = format!("SKU{product:04}-{sku:02}:en_US");
            if inventory.query_stock_level(&id) == Ok(0) {
                out_of_stock += 1;
            }
        }
    }
    println!(
        "{}: {out_of_stock} SKUs out of stock, {} queries",
        inventory.inventory_name(),
        table.query_count()
    );

    match inventory.query_stock_level("SKU0099-01") {
        Ok(level) => println!("SKU0099-01 has {level}"),
        Err(err) => println!("{err}"),
    }

    // Partitioned feed: one inventory per worker over a shared table
    drop(inventory);
    let table = Arc::new(table);
    thread::scope(|s| {
        for half in 0..2 {
            let table = Arc::clone(&table);
            s.spawn(move || {
                let mut inventory = SequentialInventory::new(25, table);
                let total: i64 = (half * 10 + 1..=half * 10 + 10)
                    .flat_map(|product| (1..=5).map(move |sku| (product, sku)))
                    .filter_map(|(product, sku)| {
                        inventory
                            .query_stock_level(&format!("SKU{product:04}-{sku:02}"))
                            .ok()
                    })
                    .sum();
                println!("partition {half}: {total} units in stock");
            });
        }
    });
    println!("{} queries in total", table.query_count());
}
