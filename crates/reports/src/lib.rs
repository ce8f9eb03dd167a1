//! `depot-reports` — the aggregation engine.
//!
//! Pure, stateless functions over rows already fetched from the record
//! store: time-windowed sales sums, top-N rankings, low-stock grouping,
//! weekday buckets, dashboard assembly and tabular export rendering. Every
//! computation is a fold over an immutable slice; nothing here performs IO.

pub mod aggregate;
pub mod export;
pub mod model;

pub use aggregate::{
    best_selling_weekday, dashboard, low_stock, top_products, windowed_sales, Dashboard,
    LowStockGroup, LowStockProduct, ProductSales, ReportingWindows, WeekdaySales,
    DEFAULT_LOW_STOCK_THRESHOLD, TOP_PRODUCTS_LIMIT,
};
pub use export::{movements_to_csv, movements_to_html};
pub use model::{
    ManufacturerSummary, MovementRow, ProductRow, UNKNOWN_MANUFACTURER, UNKNOWN_PRODUCT,
};
