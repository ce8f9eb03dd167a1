use chrono::{DateTime, Utc};
use serde::Deserialize;

use depot_catalog::{Product, StockBand};
use depot_core::{ManufacturerId, ProductId};
use depot_ledger::{Movement, MovementKind};
use depot_reports::{ManufacturerSummary, MovementRow, ProductRow};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateManufacturerRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateManufacturerRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub manufacturer_id: ManufacturerId,
    pub stock: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: String,
    pub manufacturer_id: ManufacturerId,
    pub stock: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateMovementRequest {
    pub product_id: ProductId,
    pub kind: MovementKind,
    pub quantity: i64,
    pub notes: Option<String>,
    /// Defaults to now when omitted.
    pub occurred_at: Option<DateTime<Utc>>,
}

/// Query string of `GET /products`.
#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    pub name: Option<String>,
    pub manufacturer: Option<ManufacturerId>,
    pub stock: Option<StockBand>,
}

/// Query string of `GET /movements` and its export variant.
#[derive(Debug, Default, Deserialize)]
pub struct MovementListQuery {
    pub from: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub product: Option<ProductId>,
    pub manufacturer: Option<ManufacturerId>,
    pub kind: Option<MovementKind>,
    /// Only read by the export route; listing ignores it.
    pub format: Option<ExportFormat>,
}

impl MovementListQuery {
    pub fn to_filter(&self) -> depot_ledger::MovementFilter {
        depot_ledger::MovementFilter {
            from: self.from,
            until: self.until,
            product_id: self.product,
            manufacturer_id: self.manufacturer,
            kind: self.kind,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Html,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn manufacturer_summary_to_json(summary: &ManufacturerSummary) -> serde_json::Value {
    serde_json::json!({
        "id": summary.id.to_string(),
        "name": summary.name,
        "product_count": summary.product_count,
    })
}

pub fn product_to_json(product: &Product) -> serde_json::Value {
    serde_json::json!({
        "id": product.id.to_string(),
        "name": product.name,
        "manufacturer_id": product.manufacturer_id.to_string(),
        "stock": product.stock,
    })
}

pub fn product_row_to_json(row: &ProductRow) -> serde_json::Value {
    serde_json::json!({
        "id": row.id.to_string(),
        "name": row.name,
        "manufacturer_id": row.manufacturer_id.to_string(),
        "manufacturer_name": row.manufacturer_name,
        "stock": row.stock,
    })
}

pub fn movement_to_json(movement: &Movement) -> serde_json::Value {
    serde_json::json!({
        "id": movement.id.to_string(),
        "product_id": movement.product_id.to_string(),
        "kind": movement.kind.as_str(),
        "quantity": movement.quantity,
        "occurred_at": movement.occurred_at.to_rfc3339(),
        "notes": movement.notes,
    })
}

pub fn movement_row_to_json(row: &MovementRow) -> serde_json::Value {
    serde_json::json!({
        "id": row.id.to_string(),
        "product_id": row.product_id.to_string(),
        "product_name": row.product_name,
        "manufacturer_id": row.manufacturer_id.map(|id| id.to_string()),
        "manufacturer_name": row.manufacturer_name,
        "kind": row.kind.as_str(),
        "quantity": row.quantity,
        "occurred_at": row.occurred_at.to_rfc3339(),
        "notes": row.notes,
    })
}
