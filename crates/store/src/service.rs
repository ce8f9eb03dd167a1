//! Ledger orchestration: plan with the pure engine, commit atomically,
//! retry stale reads.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use depot_catalog::Product;
use depot_core::{DomainError, ManufacturerId, MovementId, ProductId};
use depot_ledger::{
    adjustment, plan_movement, Movement, MovementKind, ADJUSTMENT_NOTE, INITIAL_STOCK_NOTE,
};

use crate::error::StoreError;
use crate::store::InventoryStore;

/// How many times a contended movement commit is retried with a fresh read.
const MAX_COMMIT_ATTEMPTS: u32 = 5;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("movement not committed after {0} attempts on a contended product")]
    Contention(u32),
}

/// The only writer of product stock.
///
/// Every stock change flows through [`apply_movement`](Self::apply_movement):
/// the pure engine plans the new counter value, and the store commits the
/// movement record plus the counter update as one atomic unit, conditional on
/// the counter still holding the value the plan was computed from.
#[derive(Clone)]
pub struct LedgerService {
    store: Arc<dyn InventoryStore>,
}

impl LedgerService {
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }

    pub async fn apply_movement(
        &self,
        product_id: ProductId,
        kind: MovementKind,
        quantity: i64,
        notes: Option<String>,
        occurred_at: Option<DateTime<Utc>>,
    ) -> Result<Movement, LedgerError> {
        let occurred_at = occurred_at.unwrap_or_else(Utc::now);

        for attempt in 1..=MAX_COMMIT_ATTEMPTS {
            let product = self
                .store
                .get_product(product_id)
                .await?
                .ok_or(DomainError::NotFound)?;

            let change = plan_movement(product.stock, kind, quantity)?;

            let movement = Movement {
                id: MovementId::new(),
                product_id,
                kind,
                quantity,
                occurred_at,
                notes: notes.clone(),
            };

            match self.store.commit_movement(change, &movement).await {
                Ok(()) => {
                    tracing::debug!(
                        product_id = %product_id,
                        kind = kind.as_str(),
                        quantity,
                        new_stock = change.new_stock,
                        "movement committed"
                    );
                    return Ok(movement);
                }
                Err(StoreError::Concurrency(reason)) => {
                    tracing::debug!(
                        product_id = %product_id,
                        attempt,
                        reason = %reason,
                        "movement commit contended, retrying"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(LedgerError::Contention(MAX_COMMIT_ATTEMPTS))
    }

    /// Create a product. Non-zero initial stock is recorded through the
    /// ledger so the counter and the movement log agree from the first write.
    pub async fn create_product(
        &self,
        name: &str,
        manufacturer_id: ManufacturerId,
        initial_stock: i64,
    ) -> Result<Product, LedgerError> {
        let product = Product::new(ProductId::new(), name, manufacturer_id, initial_stock)?;

        // Inserted with an empty counter; the initial stock arrives as a
        // regular entry movement.
        let empty = Product {
            stock: 0,
            ..product.clone()
        };
        self.store.insert_product(&empty).await?;

        if initial_stock > 0 {
            self.apply_movement(
                product.id,
                MovementKind::Entry,
                initial_stock,
                Some(INITIAL_STOCK_NOTE.to_string()),
                None,
            )
            .await?;
        }

        Ok(product)
    }

    /// Update a product. Renames and manufacturer changes are plain writes; a
    /// stock edit is recorded as a synthesized adjustment movement for the
    /// delta.
    pub async fn update_product(
        &self,
        id: ProductId,
        name: &str,
        manufacturer_id: ManufacturerId,
        stock: i64,
    ) -> Result<Product, LedgerError> {
        let target = Product::new(id, name, manufacturer_id, stock)?;

        let current = self
            .store
            .get_product(id)
            .await?
            .ok_or(DomainError::NotFound)?;

        self.store
            .update_product_info(id, &target.name, target.manufacturer_id)
            .await?;

        if let Some((kind, quantity)) = adjustment(current.stock, target.stock) {
            self.apply_movement(id, kind, quantity, Some(ADJUSTMENT_NOTE.to_string()), None)
                .await?;
        }

        self.store
            .get_product(id)
            .await?
            .ok_or(LedgerError::Domain(DomainError::NotFound))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use depot_catalog::Manufacturer;
    use depot_ledger::MovementFilter;

    async fn seeded() -> (LedgerService, Arc<MemoryStore>, ManufacturerId) {
        let store = Arc::new(MemoryStore::new());
        let manufacturer = Manufacturer::new(ManufacturerId::new(), "Acme").unwrap();
        store.insert_manufacturer(&manufacturer).await.unwrap();
        (
            LedgerService::new(store.clone()),
            store,
            manufacturer.id,
        )
    }

    #[tokio::test]
    async fn creating_a_product_synthesizes_one_initial_entry() {
        let (ledger, store, manufacturer_id) = seeded().await;

        let product = ledger
            .create_product("Laptop", manufacturer_id, 12)
            .await
            .unwrap();

        assert_eq!(
            store.get_product(product.id).await.unwrap().unwrap().stock,
            12
        );

        let movements = store
            .list_movements(&MovementFilter::default())
            .await
            .unwrap();
        assert_eq!(movements.len(), 1);
        assert_eq!(movements[0].kind, MovementKind::Entry);
        assert_eq!(movements[0].quantity, 12);
        assert_eq!(movements[0].notes.as_deref(), Some(INITIAL_STOCK_NOTE));
    }

    #[tokio::test]
    async fn zero_initial_stock_synthesizes_nothing() {
        let (ledger, store, manufacturer_id) = seeded().await;

        ledger
            .create_product("Laptop", manufacturer_id, 0)
            .await
            .unwrap();

        assert!(store
            .list_movements(&MovementFilter::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn exit_updates_stock_and_appends_movement() {
        let (ledger, store, manufacturer_id) = seeded().await;
        let product = ledger
            .create_product("Laptop", manufacturer_id, 10)
            .await
            .unwrap();

        let movement = ledger
            .apply_movement(product.id, MovementKind::Exit, 4, None, None)
            .await
            .unwrap();
        assert_eq!(movement.quantity, 4);

        assert_eq!(
            store.get_product(product.id).await.unwrap().unwrap().stock,
            6
        );
        assert_eq!(
            store
                .list_movements(&MovementFilter::default())
                .await
                .unwrap()
                .len(),
            2
        );
    }

    #[tokio::test]
    async fn insufficient_stock_rejects_and_leaves_state_untouched() {
        let (ledger, store, manufacturer_id) = seeded().await;
        let product = ledger
            .create_product("Laptop", manufacturer_id, 10)
            .await
            .unwrap();

        let err = ledger
            .apply_movement(product.id, MovementKind::Exit, 15, None, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Domain(DomainError::InsufficientStock {
                available: 10,
                requested: 15
            })
        ));

        assert_eq!(
            store.get_product(product.id).await.unwrap().unwrap().stock,
            10
        );
        assert_eq!(
            store
                .list_movements(&MovementFilter::default())
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn invalid_quantity_is_rejected() {
        let (ledger, _, manufacturer_id) = seeded().await;
        let product = ledger
            .create_product("Laptop", manufacturer_id, 10)
            .await
            .unwrap();

        let err = ledger
            .apply_movement(product.id, MovementKind::Entry, 0, None, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Domain(DomainError::InvalidQuantity(0))
        ));
    }

    #[tokio::test]
    async fn unknown_product_is_not_found() {
        let (ledger, _, _) = seeded().await;

        let err = ledger
            .apply_movement(ProductId::new(), MovementKind::Entry, 1, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Domain(DomainError::NotFound)));
    }

    #[tokio::test]
    async fn stock_edit_synthesizes_adjustment_movement() {
        let (ledger, store, manufacturer_id) = seeded().await;
        let product = ledger
            .create_product("Laptop", manufacturer_id, 10)
            .await
            .unwrap();

        let updated = ledger
            .update_product(product.id, "Laptop Pro", manufacturer_id, 4)
            .await
            .unwrap();
        assert_eq!(updated.name, "Laptop Pro");
        assert_eq!(updated.stock, 4);

        let movements = store
            .list_movements(&MovementFilter::default())
            .await
            .unwrap();
        assert_eq!(movements.len(), 2);
        let adjustment_row = movements
            .iter()
            .find(|m| m.notes.as_deref() == Some(ADJUSTMENT_NOTE))
            .unwrap();
        assert_eq!(adjustment_row.kind, MovementKind::Exit);
        assert_eq!(adjustment_row.quantity, 6);
    }

    #[tokio::test]
    async fn unchanged_stock_edit_synthesizes_nothing() {
        let (ledger, store, manufacturer_id) = seeded().await;
        let product = ledger
            .create_product("Laptop", manufacturer_id, 10)
            .await
            .unwrap();

        ledger
            .update_product(product.id, "Laptop", manufacturer_id, 10)
            .await
            .unwrap();

        assert_eq!(
            store
                .list_movements(&MovementFilter::default())
                .await
                .unwrap()
                .len(),
            1
        );
    }
}
