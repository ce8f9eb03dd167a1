use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use depot_catalog::{Manufacturer, Product, ProductFilter};
use depot_core::{ManufacturerId, ProductId};
use depot_ledger::{Movement, MovementFilter, StockChange};
use depot_reports::{ManufacturerSummary, MovementRow, ProductRow, UNKNOWN_PRODUCT};

use crate::backup::{BackupSnapshot, BACKUP_VERSION};
use crate::error::StoreError;
use crate::store::InventoryStore;

/// In-memory record store.
///
/// Intended for dev/tests. A single lock over all three relations makes
/// `commit_movement` trivially atomic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Relations>,
}

#[derive(Debug, Default)]
struct Relations {
    manufacturers: Vec<Manufacturer>,
    products: Vec<Product>,
    movements: Vec<Movement>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::Database("lock poisoned".to_string())
}

impl Relations {
    fn manufacturer_name(&self, id: ManufacturerId) -> Option<String> {
        self.manufacturers
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.name.clone())
    }

    fn product_row(&self, product: &Product) -> ProductRow {
        ProductRow {
            id: product.id,
            name: product.name.clone(),
            manufacturer_id: product.manufacturer_id,
            manufacturer_name: self.manufacturer_name(product.manufacturer_id),
            stock: product.stock,
        }
    }

    fn movement_row(&self, movement: &Movement) -> MovementRow {
        let product = self.products.iter().find(|p| p.id == movement.product_id);
        let manufacturer_id = product.map(|p| p.manufacturer_id);

        MovementRow {
            id: movement.id,
            product_id: movement.product_id,
            product_name: product
                .map(|p| p.name.clone())
                .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string()),
            manufacturer_id,
            manufacturer_name: manufacturer_id.and_then(|id| self.manufacturer_name(id)),
            kind: movement.kind,
            quantity: movement.quantity,
            occurred_at: movement.occurred_at,
            notes: movement.notes.clone(),
        }
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn insert_manufacturer(&self, manufacturer: &Manufacturer) -> Result<(), StoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        if inner.manufacturers.iter().any(|m| m.id == manufacturer.id) {
            return Err(StoreError::Constraint(format!(
                "manufacturer {} already exists",
                manufacturer.id
            )));
        }
        inner.manufacturers.push(manufacturer.clone());
        Ok(())
    }

    async fn get_manufacturer(
        &self,
        id: ManufacturerId,
    ) -> Result<Option<Manufacturer>, StoreError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner.manufacturers.iter().find(|m| m.id == id).cloned())
    }

    async fn list_manufacturers(&self) -> Result<Vec<ManufacturerSummary>, StoreError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        let mut summaries: Vec<ManufacturerSummary> = inner
            .manufacturers
            .iter()
            .map(|m| ManufacturerSummary {
                id: m.id,
                name: m.name.clone(),
                product_count: inner
                    .products
                    .iter()
                    .filter(|p| p.manufacturer_id == m.id)
                    .count() as i64,
            })
            .collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(summaries)
    }

    async fn rename_manufacturer(&self, id: ManufacturerId, name: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        let manufacturer = inner
            .manufacturers
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(StoreError::NotFound)?;
        manufacturer.name = name.to_string();
        Ok(())
    }

    async fn delete_manufacturer(&self, id: ManufacturerId) -> Result<(), StoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        let before = inner.manufacturers.len();
        inner.manufacturers.retain(|m| m.id != id);
        if inner.manufacturers.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn insert_product(&self, product: &Product) -> Result<(), StoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        if inner.products.iter().any(|p| p.id == product.id) {
            return Err(StoreError::Constraint(format!(
                "product {} already exists",
                product.id
            )));
        }
        inner.products.push(product.clone());
        Ok(())
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner.products.iter().find(|p| p.id == id).cloned())
    }

    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<ProductRow>, StoreError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        let mut rows: Vec<ProductRow> = inner
            .products
            .iter()
            .filter(|p| filter.matches(p))
            .map(|p| inner.product_row(p))
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn update_product_info(
        &self,
        id: ProductId,
        name: &str,
        manufacturer_id: ManufacturerId,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        let product = inner
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::NotFound)?;
        product.name = name.to_string();
        product.manufacturer_id = manufacturer_id;
        Ok(())
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), StoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        let before = inner.products.len();
        inner.products.retain(|p| p.id != id);
        if inner.products.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn commit_movement(
        &self,
        change: StockChange,
        movement: &Movement,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;

        let product = inner
            .products
            .iter_mut()
            .find(|p| p.id == movement.product_id)
            .ok_or(StoreError::NotFound)?;

        if product.stock != change.previous_stock {
            return Err(StoreError::Concurrency(format!(
                "expected stock {}, found {}",
                change.previous_stock, product.stock
            )));
        }

        product.stock = change.new_stock;
        inner.movements.push(movement.clone());
        Ok(())
    }

    async fn list_movements(
        &self,
        filter: &MovementFilter,
    ) -> Result<Vec<MovementRow>, StoreError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        let mut rows: Vec<MovementRow> = inner
            .movements
            .iter()
            .filter(|m| filter.matches_movement(m))
            .map(|m| inner.movement_row(m))
            .filter(|row| match filter.manufacturer_id {
                Some(manufacturer_id) => row.manufacturer_id == Some(manufacturer_id),
                None => true,
            })
            .collect();
        rows.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
        Ok(rows)
    }

    async fn snapshot(&self) -> Result<BackupSnapshot, StoreError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;

        let mut manufacturers = inner.manufacturers.clone();
        manufacturers.sort_by(|a, b| a.name.cmp(&b.name));

        let mut products = inner.products.clone();
        products.sort_by(|a, b| a.name.cmp(&b.name));

        let mut movements = inner.movements.clone();
        movements.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));

        Ok(BackupSnapshot {
            version: BACKUP_VERSION.to_string(),
            date: Utc::now(),
            manufacturers,
            products,
            movements,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use depot_catalog::StockBand;
    use depot_core::MovementId;
    use depot_ledger::MovementKind;

    fn manufacturer(name: &str) -> Manufacturer {
        Manufacturer::new(ManufacturerId::new(), name).unwrap()
    }

    fn product(name: &str, manufacturer_id: ManufacturerId, stock: i64) -> Product {
        Product::new(ProductId::new(), name, manufacturer_id, stock).unwrap()
    }

    fn movement(product_id: ProductId, kind: MovementKind, quantity: i64) -> Movement {
        Movement {
            id: MovementId::new(),
            product_id,
            kind,
            quantity,
            occurred_at: Utc::now(),
            notes: None,
        }
    }

    #[tokio::test]
    async fn manufacturer_listing_carries_product_counts() {
        let store = MemoryStore::new();
        let acme = manufacturer("Acme");
        let globex = manufacturer("Globex");
        store.insert_manufacturer(&acme).await.unwrap();
        store.insert_manufacturer(&globex).await.unwrap();
        store
            .insert_product(&product("Laptop", acme.id, 10))
            .await
            .unwrap();
        store
            .insert_product(&product("Mouse", acme.id, 3))
            .await
            .unwrap();

        let listed = store.list_manufacturers().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].name, "Acme");
        assert_eq!(listed[0].product_count, 2);
        assert_eq!(listed[1].product_count, 0);
    }

    #[tokio::test]
    async fn deleting_a_manufacturer_leaves_products_dangling() {
        let store = MemoryStore::new();
        let acme = manufacturer("Acme");
        store.insert_manufacturer(&acme).await.unwrap();
        let p = product("Laptop", acme.id, 10);
        store.insert_product(&p).await.unwrap();

        store.delete_manufacturer(acme.id).await.unwrap();

        let rows = store.list_products(&ProductFilter::default()).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].manufacturer_id, acme.id);
        assert_eq!(rows[0].manufacturer_name, None);
    }

    #[tokio::test]
    async fn product_filters_compose() {
        let store = MemoryStore::new();
        let acme = manufacturer("Acme");
        store.insert_manufacturer(&acme).await.unwrap();
        store
            .insert_product(&product("Laptop", acme.id, 30))
            .await
            .unwrap();
        store
            .insert_product(&product("Laptop stand", acme.id, 2))
            .await
            .unwrap();

        let filter = ProductFilter {
            name_contains: Some("laptop".to_string()),
            manufacturer_id: Some(acme.id),
            stock_band: Some(StockBand::Low),
        };
        let rows = store.list_products(&filter).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Laptop stand");
    }

    #[tokio::test]
    async fn commit_movement_applies_both_writes() {
        let store = MemoryStore::new();
        let acme = manufacturer("Acme");
        store.insert_manufacturer(&acme).await.unwrap();
        let p = product("Laptop", acme.id, 10);
        store.insert_product(&p).await.unwrap();

        let change = StockChange {
            previous_stock: 10,
            new_stock: 6,
        };
        store
            .commit_movement(change, &movement(p.id, MovementKind::Exit, 4))
            .await
            .unwrap();

        assert_eq!(store.get_product(p.id).await.unwrap().unwrap().stock, 6);
        let rows = store
            .list_movements(&MovementFilter::default())
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].quantity, 4);
        assert_eq!(rows[0].product_name, "Laptop");
    }

    #[tokio::test]
    async fn stale_commit_is_rejected_and_changes_nothing() {
        let store = MemoryStore::new();
        let acme = manufacturer("Acme");
        store.insert_manufacturer(&acme).await.unwrap();
        let p = product("Laptop", acme.id, 10);
        store.insert_product(&p).await.unwrap();

        let stale = StockChange {
            previous_stock: 8,
            new_stock: 4,
        };
        let err = store
            .commit_movement(stale, &movement(p.id, MovementKind::Exit, 4))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Concurrency(_)));

        assert_eq!(store.get_product(p.id).await.unwrap().unwrap().stock, 10);
        assert!(store
            .list_movements(&MovementFilter::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn movement_listing_is_newest_first_and_filterable() {
        let store = MemoryStore::new();
        let acme = manufacturer("Acme");
        let globex = manufacturer("Globex");
        store.insert_manufacturer(&acme).await.unwrap();
        store.insert_manufacturer(&globex).await.unwrap();
        let laptop = product("Laptop", acme.id, 100);
        let monitor = product("Monitor", globex.id, 100);
        store.insert_product(&laptop).await.unwrap();
        store.insert_product(&monitor).await.unwrap();

        let now = Utc::now();
        for (p, offset, quantity) in [
            (&laptop, 3i64, 1i64),
            (&monitor, 2, 2),
            (&laptop, 1, 3),
        ] {
            let m = Movement {
                occurred_at: now - Duration::hours(offset),
                ..movement(p.id, MovementKind::Exit, quantity)
            };
            let stock = store.get_product(p.id).await.unwrap().unwrap().stock;
            store
                .commit_movement(
                    StockChange {
                        previous_stock: stock,
                        new_stock: stock - quantity,
                    },
                    &m,
                )
                .await
                .unwrap();
        }

        let all = store
            .list_movements(&MovementFilter::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
        assert!(all[0].occurred_at > all[1].occurred_at);
        assert!(all[1].occurred_at > all[2].occurred_at);

        let acme_only = store
            .list_movements(&MovementFilter {
                manufacturer_id: Some(acme.id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(acme_only.len(), 2);
        assert!(acme_only.iter().all(|r| r.manufacturer_id == Some(acme.id)));
    }

    #[tokio::test]
    async fn snapshot_contains_all_relations() {
        let store = MemoryStore::new();
        let acme = manufacturer("Acme");
        store.insert_manufacturer(&acme).await.unwrap();
        let p = product("Laptop", acme.id, 5);
        store.insert_product(&p).await.unwrap();
        store
            .commit_movement(
                StockChange {
                    previous_stock: 5,
                    new_stock: 9,
                },
                &movement(p.id, MovementKind::Entry, 4),
            )
            .await
            .unwrap();

        let snapshot = store.snapshot().await.unwrap();
        assert_eq!(snapshot.version, BACKUP_VERSION);
        assert_eq!(snapshot.manufacturers.len(), 1);
        assert_eq!(snapshot.products.len(), 1);
        assert_eq!(snapshot.products[0].stock, 9);
        assert_eq!(snapshot.movements.len(), 1);
    }
}
