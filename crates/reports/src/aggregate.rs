//! Windowed sums, rankings and groupings over movement/product rows.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use serde::Serialize;

use depot_core::{ManufacturerId, ProductId};
use depot_ledger::MovementKind;

use crate::model::{MovementRow, ProductRow};

/// Products with `stock` below this many units count as low stock unless the
/// caller overrides the threshold.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

/// How many products each dashboard ranking keeps.
pub const TOP_PRODUCTS_LIMIT: usize = 5;

/// Sum of exit quantities since `start` (inclusive).
pub fn windowed_sales(movements: &[MovementRow], start: DateTime<Utc>) -> i64 {
    movements
        .iter()
        .filter(|m| m.kind == MovementKind::Exit && m.occurred_at >= start)
        .map(|m| m.quantity)
        .sum()
}

/// One entry of a top-products ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductSales {
    pub product_id: ProductId,
    pub name: String,
    pub count: i64,
}

/// Exit quantities since `start`, grouped by product, ranked descending.
///
/// Ties keep first-seen order: grouping tracks the order products appear in
/// the input and the sort is stable, so equal counts never reshuffle.
pub fn top_products(
    movements: &[MovementRow],
    start: DateTime<Utc>,
    limit: usize,
) -> Vec<ProductSales> {
    let mut order: Vec<ProductId> = Vec::new();
    let mut totals: HashMap<ProductId, ProductSales> = HashMap::new();

    for m in movements
        .iter()
        .filter(|m| m.kind == MovementKind::Exit && m.occurred_at >= start)
    {
        let entry = totals.entry(m.product_id).or_insert_with(|| {
            order.push(m.product_id);
            ProductSales {
                product_id: m.product_id,
                name: m.product_name.clone(),
                count: 0,
            }
        });
        entry.count += m.quantity;
    }

    let mut ranked: Vec<ProductSales> = order
        .into_iter()
        .filter_map(|id| totals.remove(&id))
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(limit);
    ranked
}

/// One product inside a low-stock group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LowStockProduct {
    pub id: ProductId,
    pub name: String,
    pub stock: i64,
}

/// Low-stock products of one manufacturer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LowStockGroup {
    pub manufacturer_id: ManufacturerId,
    pub manufacturer_name: String,
    pub products: Vec<LowStockProduct>,
}

/// Products with `stock < threshold`, grouped by manufacturer in first-seen
/// order.
pub fn low_stock(products: &[ProductRow], threshold: i64) -> Vec<LowStockGroup> {
    let mut order: Vec<ManufacturerId> = Vec::new();
    let mut groups: HashMap<ManufacturerId, LowStockGroup> = HashMap::new();

    for p in products.iter().filter(|p| p.stock < threshold) {
        let group = groups.entry(p.manufacturer_id).or_insert_with(|| {
            order.push(p.manufacturer_id);
            LowStockGroup {
                manufacturer_id: p.manufacturer_id,
                manufacturer_name: p.manufacturer_label().to_string(),
                products: Vec::new(),
            }
        });
        group.products.push(LowStockProduct {
            id: p.id,
            name: p.name.clone(),
            stock: p.stock,
        });
    }

    order
        .into_iter()
        .filter_map(|id| groups.remove(&id))
        .collect()
}

const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// The weekday with the largest exit quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekdaySales {
    pub weekday: String,
    pub count: i64,
}

/// Bucket exit quantities since `start` by UTC calendar weekday and return
/// the heaviest bucket.
///
/// The scan keeps the first encountered maximum, so ties resolve to the
/// lowest weekday index (0 = Sunday). With no data the result is Sunday with
/// a count of zero.
pub fn best_selling_weekday(movements: &[MovementRow], start: DateTime<Utc>) -> WeekdaySales {
    let mut buckets = [0i64; 7];

    for m in movements
        .iter()
        .filter(|m| m.kind == MovementKind::Exit && m.occurred_at >= start)
    {
        let idx = m.occurred_at.weekday().num_days_from_sunday() as usize;
        buckets[idx] += m.quantity;
    }

    let mut best = 0usize;
    for (idx, &count) in buckets.iter().enumerate() {
        if count > buckets[best] {
            best = idx;
        }
    }

    WeekdaySales {
        weekday: WEEKDAY_NAMES[best].to_string(),
        count: buckets[best],
    }
}

/// The rolling windows the dashboard reports over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportingWindows {
    pub day_start: DateTime<Utc>,
    pub week_start: DateTime<Utc>,
    pub month_start: DateTime<Utc>,
}

impl ReportingWindows {
    /// The day window opens at UTC midnight; the week and month windows open
    /// at midnight 7 and 30 days back.
    pub fn at(now: DateTime<Utc>) -> Self {
        let day_start = now.date_naive().and_time(NaiveTime::MIN).and_utc();
        Self {
            day_start,
            week_start: day_start - Duration::days(7),
            month_start: day_start - Duration::days(30),
        }
    }
}

/// Everything the dashboard view renders, derived in one pass from the full
/// movement history and product listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub daily_sales: i64,
    pub weekly_sales: i64,
    pub monthly_sales: i64,
    pub top_daily_products: Vec<ProductSales>,
    pub top_weekly_products: Vec<ProductSales>,
    pub top_monthly_products: Vec<ProductSales>,
    pub low_stock: Vec<LowStockGroup>,
    pub best_selling_weekday: WeekdaySales,
}

/// Assemble the dashboard. Recomputed per read; there is no cached or
/// incrementally-maintained state behind this.
pub fn dashboard(
    movements: &[MovementRow],
    products: &[ProductRow],
    now: DateTime<Utc>,
    low_stock_threshold: i64,
) -> Dashboard {
    let windows = ReportingWindows::at(now);

    Dashboard {
        daily_sales: windowed_sales(movements, windows.day_start),
        weekly_sales: windowed_sales(movements, windows.week_start),
        monthly_sales: windowed_sales(movements, windows.month_start),
        top_daily_products: top_products(movements, windows.day_start, TOP_PRODUCTS_LIMIT),
        top_weekly_products: top_products(movements, windows.week_start, TOP_PRODUCTS_LIMIT),
        top_monthly_products: top_products(movements, windows.month_start, TOP_PRODUCTS_LIMIT),
        low_stock: low_stock(products, low_stock_threshold),
        best_selling_weekday: best_selling_weekday(movements, windows.month_start),
    }
}
