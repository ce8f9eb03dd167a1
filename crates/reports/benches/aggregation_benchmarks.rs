//! Benchmarks for the aggregation engine: dashboard assembly over a year of
//! synthetic movement history.

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use depot_core::{ManufacturerId, MovementId, ProductId};
use depot_ledger::MovementKind;
use depot_reports::{dashboard, top_products, windowed_sales, MovementRow, ProductRow};

fn synthetic_history(products: usize, movements: usize) -> (Vec<MovementRow>, Vec<ProductRow>) {
    let base = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let manufacturer = ManufacturerId::new();

    let product_rows: Vec<ProductRow> = (0..products)
        .map(|i| ProductRow {
            id: ProductId::new(),
            name: format!("product-{i}"),
            manufacturer_id: manufacturer,
            manufacturer_name: Some("bench".to_string()),
            stock: (i % 40) as i64,
        })
        .collect();

    let movement_rows: Vec<MovementRow> = (0..movements)
        .map(|i| {
            let product = &product_rows[i % products];
            MovementRow {
                id: MovementId::new(),
                product_id: product.id,
                product_name: product.name.clone(),
                manufacturer_id: Some(manufacturer),
                manufacturer_name: Some("bench".to_string()),
                kind: if i % 3 == 0 {
                    MovementKind::Entry
                } else {
                    MovementKind::Exit
                },
                quantity: (i % 9 + 1) as i64,
                occurred_at: base + Duration::minutes(i as i64),
                notes: None,
            }
        })
        .collect();

    (movement_rows, product_rows)
}

fn bench_aggregations(c: &mut Criterion) {
    let (movements, products) = synthetic_history(200, 50_000);
    let now = Utc.with_ymd_and_hms(2025, 2, 4, 12, 0, 0).unwrap();
    let start = now - Duration::days(30);

    c.bench_function("windowed_sales/50k", |b| {
        b.iter(|| windowed_sales(black_box(&movements), black_box(start)))
    });

    c.bench_function("top_products/50k", |b| {
        b.iter(|| top_products(black_box(&movements), black_box(start), 5))
    });

    c.bench_function("dashboard/50k", |b| {
        b.iter(|| {
            dashboard(
                black_box(&movements),
                black_box(&products),
                black_box(now),
                5,
            )
        })
    });
}

criterion_group!(benches, bench_aggregations);
criterion_main!(benches);
