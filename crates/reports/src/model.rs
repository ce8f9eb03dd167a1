//! Read-model rows produced by the record store.
//!
//! These are disposable join results: the store rebuilds them on every read
//! and the aggregation engine folds over them.

use chrono::{DateTime, Utc};
use serde::Serialize;

use depot_core::{ManufacturerId, MovementId, ProductId};
use depot_ledger::MovementKind;

/// Placeholder rendered for a dangling manufacturer reference (the catalog
/// allows deleting a manufacturer without cascading to its products).
pub const UNKNOWN_MANUFACTURER: &str = "unknown manufacturer";

/// Placeholder rendered when a movement's product has been deleted.
pub const UNKNOWN_PRODUCT: &str = "unknown product";

/// Manufacturer listing row with its product count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManufacturerSummary {
    pub id: ManufacturerId,
    pub name: String,
    pub product_count: i64,
}

/// Product listing row joined with its manufacturer's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRow {
    pub id: ProductId,
    pub name: String,
    pub manufacturer_id: ManufacturerId,
    /// `None` when the manufacturer reference dangles.
    pub manufacturer_name: Option<String>,
    pub stock: i64,
}

impl ProductRow {
    pub fn manufacturer_label(&self) -> &str {
        self.manufacturer_name
            .as_deref()
            .unwrap_or(UNKNOWN_MANUFACTURER)
    }
}

/// Movement report row joined with product and manufacturer names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovementRow {
    pub id: MovementId,
    pub product_id: ProductId,
    /// Falls back to [`UNKNOWN_PRODUCT`] when the product has been deleted.
    pub product_name: String,
    pub manufacturer_id: Option<ManufacturerId>,
    pub manufacturer_name: Option<String>,
    pub kind: MovementKind,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
    pub notes: Option<String>,
}

impl MovementRow {
    pub fn manufacturer_label(&self) -> &str {
        self.manufacturer_name
            .as_deref()
            .unwrap_or(UNKNOWN_MANUFACTURER)
    }
}
