// ==============================================
// INVENTORY FEED TESTS (integration)
// ==============================================
//
// A catalog feed walks SKUs in order and asks for stock levels, sometimes
// with a locale suffix, sometimes jumping back to a SKU it already passed.

use seqwindow::error::WindowError;
use seqwindow::inventory::{
    Column, InventoryEntry, InventoryError, InventoryRow, InventoryTable, RowDecodeError,
    SequentialInventory, COLUMN_STOCK_LEVEL,
};

const SKUS: [(&str, i64); 12] = [
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
];

fn catalog() -> InventoryTable {
    SKUS.iter()
        .map(|&(id, stock)| {
            (
                id.to_string(),
                InventoryEntry {
                    stock_level: stock,
                    backorder_level: 0,
                    availability_status: 1000,
                },
            )
        })
        .collect()
}

#[test]
fn stock_levels_in_feed_order() {
    let table = catalog();
    let mut inventory = SequentialInventory::new(4, &table);

    for (id, stock) in SKUS {
        assert_eq!(inventory.query_stock_level(id), Ok(stock), "stock of {id}");
    }
    assert_eq!(table.query_count(), 3);
}

#[test]
fn stock_levels_back_and_forth() {
    let table = catalog();
    let mut inventory = SequentialInventory::new(4, &table);

    for (id, stock) in SKUS {
        assert_eq!(inventory.query_stock_level(id), Ok(stock));
    }
    assert_eq!(inventory.query_stock_level("SKU0001-01"), Ok(1));
    assert_eq!(inventory.query_stock_level("SKU0004-02"), Ok(2));
    assert_eq!(inventory.query_stock_level("SKU0002-03"), Ok(3));
    assert_eq!(table.query_count(), 6);
}

#[test]
fn locale_suffix_shares_the_window() {
    let table = catalog();
    let mut inventory = SequentialInventory::new(4, &table);

    assert_eq!(inventory.query_stock_level("SKU0001-01:en_US"), Ok(1));
    assert_eq!(inventory.query_stock_level("SKU0001-02:fr_CA"), Ok(2));
    assert_eq!(inventory.query_stock_level("SKU0002-01"), Ok(1));
    assert_eq!(table.query_count(), 1);
}

#[test]
fn sku_past_the_catalog_is_not_found() {
    let table = catalog();
    let mut inventory = SequentialInventory::new(4, &table);

    let err = inventory.query_stock_level("SKU0006-05").unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.sku(), "SKU0006-05");
    assert_eq!(table.query_count(), 1);
}

#[test]
fn gap_in_catalog_is_not_found_with_range() {
    let table = catalog();
    let mut inventory = SequentialInventory::new(4, &table);

    // SKU0003-01 falls between SKU0002-03 and SKU0003-03
    let err = inventory.query_stock_level("SKU0003-01").unwrap_err();
    assert_eq!(
        err,
        InventoryError::NotFound {
            sku: "SKU0003-01".to_string(),
            range: "SKU0003-03 - SKU0004-02".to_string(),
        }
    );
    // the window loaded by the miss serves what follows
    assert_eq!(inventory.query_stock_level("SKU0003-04"), Ok(4));
    assert_eq!(table.query_count(), 1);
}

#[test]
fn bad_row_keeps_previous_window() {
    let mut table = catalog();
    table.insert_row(
        "SKU0005-01",
        InventoryRow::from_levels("SKU0005-01", InventoryEntry::default())
            .with(COLUMN_STOCK_LEVEL, Column::Text("many".to_string())),
    );
    let mut inventory = SequentialInventory::new(4, &table);

    assert_eq!(inventory.query_stock_level("SKU0004-02"), Ok(2));
    let err = inventory.query_stock_level("SKU0005-01").unwrap_err();
    assert_eq!(
        err,
        InventoryError::Backend {
            sku: "SKU0005-01".to_string(),
            source: WindowError::Decode(RowDecodeError::NotAnInteger {
                column: COLUMN_STOCK_LEVEL.to_string(),
            }),
        }
    );
    assert_eq!(inventory.query_stock_level("SKU0004-03"), Ok(3));
    assert_eq!(table.query_count(), 2);
}
