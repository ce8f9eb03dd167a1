use async_trait::async_trait;

use depot_catalog::{Manufacturer, Product, ProductFilter};
use depot_core::{ManufacturerId, ProductId};
use depot_ledger::{Movement, MovementFilter, StockChange};
use depot_reports::{ManufacturerSummary, MovementRow, ProductRow};

use crate::backup::BackupSnapshot;
use crate::error::StoreError;

/// Repository boundary over manufacturers, products and the movement ledger.
///
/// `commit_movement` is the only operation that writes `product.stock`, and
/// its two writes (stock update + movement append) land atomically or not at
/// all.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    async fn insert_manufacturer(&self, manufacturer: &Manufacturer) -> Result<(), StoreError>;

    async fn get_manufacturer(
        &self,
        id: ManufacturerId,
    ) -> Result<Option<Manufacturer>, StoreError>;

    /// All manufacturers with their product counts, ordered by name.
    async fn list_manufacturers(&self) -> Result<Vec<ManufacturerSummary>, StoreError>;

    async fn rename_manufacturer(&self, id: ManufacturerId, name: &str) -> Result<(), StoreError>;

    /// No cascade: products keep a dangling manufacturer reference.
    async fn delete_manufacturer(&self, id: ManufacturerId) -> Result<(), StoreError>;

    async fn insert_product(&self, product: &Product) -> Result<(), StoreError>;

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// Products matching `filter`, ordered by name, joined with manufacturer
    /// names.
    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<ProductRow>, StoreError>;

    /// Update name and manufacturer only. Stock changes go through
    /// `commit_movement`.
    async fn update_product_info(
        &self,
        id: ProductId,
        name: &str,
        manufacturer_id: ManufacturerId,
    ) -> Result<(), StoreError>;

    async fn delete_product(&self, id: ProductId) -> Result<(), StoreError>;

    /// Atomically set the product's stock to `change.new_stock` and append
    /// `movement`. Fails with [`StoreError::Concurrency`] when the counter no
    /// longer holds `change.previous_stock`.
    async fn commit_movement(
        &self,
        change: StockChange,
        movement: &Movement,
    ) -> Result<(), StoreError>;

    /// Movements matching `filter`, newest first, joined with product and
    /// manufacturer names.
    async fn list_movements(&self, filter: &MovementFilter)
        -> Result<Vec<MovementRow>, StoreError>;

    /// Full backup snapshot of all three relations.
    async fn snapshot(&self) -> Result<BackupSnapshot, StoreError>;
}
