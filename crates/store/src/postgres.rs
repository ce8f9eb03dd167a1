//! Postgres-backed record store.
//!
//! ## Error mapping
//!
//! SQLx errors map to [`StoreError`] by Postgres error code: unique (`23505`)
//! and check (`23514`) violations become `Constraint`; everything else
//! becomes `Database`. The `Concurrency` variant never comes from an error —
//! it is produced when the conditional stock update matches zero rows.
//!
//! ## Atomic movement commit
//!
//! `commit_movement` runs one transaction:
//!
//! 1. `UPDATE products SET stock = $new WHERE id = $id AND stock = $expected`
//! 2. `INSERT INTO inventory_movements …`
//!
//! Zero rows affected in step 1 aborts the transaction — either the product
//! vanished (`NotFound`) or another writer moved the counter first
//! (`Concurrency`).

use core::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use depot_catalog::{Manufacturer, Product, ProductFilter};
use depot_core::{ManufacturerId, MovementId, ProductId};
use depot_ledger::{Movement, MovementFilter, MovementKind, StockChange};
use depot_reports::{ManufacturerSummary, MovementRow, ProductRow, UNKNOWN_PRODUCT};

use crate::backup::{BackupSnapshot, BACKUP_VERSION};
use crate::error::StoreError;
use crate::store::InventoryStore;

/// Idempotent schema bootstrap, run once at connect time.
///
/// `products.manufacturer_id` carries no foreign key: manufacturer deletes do
/// not cascade and the reference is allowed to dangle.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS manufacturers (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS products (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        manufacturer_id UUID NOT NULL,
        stock BIGINT NOT NULL CHECK (stock >= 0)
    )",
    "CREATE TABLE IF NOT EXISTS inventory_movements (
        id UUID PRIMARY KEY,
        product_id UUID NOT NULL,
        kind TEXT NOT NULL CHECK (kind IN ('entry', 'exit')),
        quantity BIGINT NOT NULL CHECK (quantity > 0),
        occurred_at TIMESTAMPTZ NOT NULL,
        notes TEXT
    )",
    "CREATE INDEX IF NOT EXISTS idx_products_manufacturer ON products (manufacturer_id)",
    "CREATE INDEX IF NOT EXISTS idx_movements_product ON inventory_movements (product_id)",
    "CREATE INDEX IF NOT EXISTS idx_movements_occurred_at
        ON inventory_movements (occurred_at DESC)",
];

/// Postgres record store.
///
/// Thread-safe: all operations go through the SQLx connection pool.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect and bootstrap the schema.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Wrap an existing pool (used by deployments that manage pooling
    /// themselves).
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        }
        tracing::debug!("schema bootstrap complete");
        Ok(())
    }
}

#[async_trait]
impl InventoryStore for PostgresStore {
    async fn insert_manufacturer(&self, manufacturer: &Manufacturer) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO manufacturers (id, name) VALUES ($1, $2)")
            .bind(manufacturer.id.as_uuid())
            .bind(&manufacturer.name)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert_manufacturer", e))?;
        Ok(())
    }

    async fn get_manufacturer(
        &self,
        id: ManufacturerId,
    ) -> Result<Option<Manufacturer>, StoreError> {
        let row = sqlx::query("SELECT id, name FROM manufacturers WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_manufacturer", e))?;

        row.map(|r| manufacturer_from_row(&r)).transpose()
    }

    async fn list_manufacturers(&self) -> Result<Vec<ManufacturerSummary>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT m.id, m.name, COUNT(p.id) AS product_count
            FROM manufacturers m
            LEFT JOIN products p ON p.manufacturer_id = m.id
            GROUP BY m.id, m.name
            ORDER BY m.name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_manufacturers", e))?;

        rows.iter()
            .map(|r| {
                Ok(ManufacturerSummary {
                    id: ManufacturerId::from_uuid(get(r, "id")?),
                    name: get(r, "name")?,
                    product_count: get(r, "product_count")?,
                })
            })
            .collect()
    }

    async fn rename_manufacturer(&self, id: ManufacturerId, name: &str) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE manufacturers SET name = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("rename_manufacturer", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete_manufacturer(&self, id: ManufacturerId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM manufacturers WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_manufacturer", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn insert_product(&self, product: &Product) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO products (id, name, manufacturer_id, stock) VALUES ($1, $2, $3, $4)",
        )
        .bind(product.id.as_uuid())
        .bind(&product.name)
        .bind(product.manufacturer_id.as_uuid())
        .bind(product.stock)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_product", e))?;
        Ok(())
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let row =
            sqlx::query("SELECT id, name, manufacturer_id, stock FROM products WHERE id = $1")
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("get_product", e))?;

        row.map(|r| product_from_row(&r)).transpose()
    }

    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<ProductRow>, StoreError> {
        let name_param: Option<&str> = filter.name_contains.as_deref();
        let manufacturer_param = filter.manufacturer_id.map(|id| *id.as_uuid());
        let band_param: Option<&str> = filter.stock_band.map(|b| b.as_str());

        let rows = sqlx::query(
            r#"
            SELECT p.id, p.name, p.manufacturer_id, m.name AS manufacturer_name, p.stock
            FROM products p
            LEFT JOIN manufacturers m ON m.id = p.manufacturer_id
            WHERE ($1::text IS NULL OR p.name ILIKE '%' || $1 || '%')
              AND ($2::uuid IS NULL OR p.manufacturer_id = $2)
              AND ($3::text IS NULL
                   OR ($3 = 'low' AND p.stock < 5)
                   OR ($3 = 'medium' AND p.stock BETWEEN 5 AND 20)
                   OR ($3 = 'high' AND p.stock > 20))
            ORDER BY p.name
            "#,
        )
        .bind(name_param)
        .bind(manufacturer_param)
        .bind(band_param)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_products", e))?;

        rows.iter()
            .map(|r| {
                Ok(ProductRow {
                    id: ProductId::from_uuid(get(r, "id")?),
                    name: get(r, "name")?,
                    manufacturer_id: ManufacturerId::from_uuid(get(r, "manufacturer_id")?),
                    manufacturer_name: get(r, "manufacturer_name")?,
                    stock: get(r, "stock")?,
                })
            })
            .collect()
    }

    async fn update_product_info(
        &self,
        id: ProductId,
        name: &str,
        manufacturer_id: ManufacturerId,
    ) -> Result<(), StoreError> {
        let result =
            sqlx::query("UPDATE products SET name = $2, manufacturer_id = $3 WHERE id = $1")
                .bind(id.as_uuid())
                .bind(name)
                .bind(manufacturer_id.as_uuid())
                .execute(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("update_product_info", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_product", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn commit_movement(
        &self,
        change: StockChange,
        movement: &Movement,
    ) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        let updated = sqlx::query("UPDATE products SET stock = $3 WHERE id = $1 AND stock = $2")
            .bind(movement.product_id.as_uuid())
            .bind(change.previous_stock)
            .bind(change.new_stock)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("update_stock", e))?;

        if updated.rows_affected() == 0 {
            let exists = sqlx::query("SELECT 1 FROM products WHERE id = $1")
                .bind(movement.product_id.as_uuid())
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error("check_product", e))?
                .is_some();

            tx.rollback()
                .await
                .map_err(|e| map_sqlx_error("rollback", e))?;

            return Err(if exists {
                StoreError::Concurrency(format!(
                    "stock no longer holds expected value {}",
                    change.previous_stock
                ))
            } else {
                StoreError::NotFound
            });
        }

        sqlx::query(
            r#"
            INSERT INTO inventory_movements (id, product_id, kind, quantity, occurred_at, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(movement.id.as_uuid())
        .bind(movement.product_id.as_uuid())
        .bind(movement.kind.as_str())
        .bind(movement.quantity)
        .bind(movement.occurred_at)
        .bind(&movement.notes)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("insert_movement", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;

        Ok(())
    }

    async fn list_movements(
        &self,
        filter: &MovementFilter,
    ) -> Result<Vec<MovementRow>, StoreError> {
        let product_param = filter.product_id.map(|id| *id.as_uuid());
        let manufacturer_param = filter.manufacturer_id.map(|id| *id.as_uuid());
        let kind_param: Option<&str> = filter.kind.map(|k| k.as_str());

        let rows = sqlx::query(
            r#"
            SELECT
                v.id,
                v.product_id,
                p.name AS product_name,
                p.manufacturer_id,
                m.name AS manufacturer_name,
                v.kind,
                v.quantity,
                v.occurred_at,
                v.notes
            FROM inventory_movements v
            LEFT JOIN products p ON p.id = v.product_id
            LEFT JOIN manufacturers m ON m.id = p.manufacturer_id
            WHERE ($1::timestamptz IS NULL OR v.occurred_at >= $1)
              AND ($2::timestamptz IS NULL OR v.occurred_at <= $2)
              AND ($3::uuid IS NULL OR v.product_id = $3)
              AND ($4::uuid IS NULL OR p.manufacturer_id = $4)
              AND ($5::text IS NULL OR v.kind = $5)
            ORDER BY v.occurred_at DESC
            "#,
        )
        .bind(filter.from)
        .bind(filter.until)
        .bind(product_param)
        .bind(manufacturer_param)
        .bind(kind_param)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_movements", e))?;

        rows.iter()
            .map(|r| {
                let product_name: Option<String> = get(r, "product_name")?;
                let manufacturer_id: Option<uuid::Uuid> = get(r, "manufacturer_id")?;
                Ok(MovementRow {
                    id: MovementId::from_uuid(get(r, "id")?),
                    product_id: ProductId::from_uuid(get(r, "product_id")?),
                    product_name: product_name.unwrap_or_else(|| UNKNOWN_PRODUCT.to_string()),
                    manufacturer_id: manufacturer_id.map(ManufacturerId::from_uuid),
                    manufacturer_name: get(r, "manufacturer_name")?,
                    kind: kind_from_column(&get::<String>(r, "kind")?)?,
                    quantity: get(r, "quantity")?,
                    occurred_at: get(r, "occurred_at")?,
                    notes: get(r, "notes")?,
                })
            })
            .collect()
    }

    async fn snapshot(&self) -> Result<BackupSnapshot, StoreError> {
        let manufacturer_rows = sqlx::query("SELECT id, name FROM manufacturers ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("snapshot_manufacturers", e))?;
        let manufacturers = manufacturer_rows
            .iter()
            .map(manufacturer_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        let product_rows = sqlx::query(
            "SELECT id, name, manufacturer_id, stock FROM products ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("snapshot_products", e))?;
        let products = product_rows
            .iter()
            .map(product_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        let movement_rows = sqlx::query(
            r#"
            SELECT id, product_id, kind, quantity, occurred_at, notes
            FROM inventory_movements
            ORDER BY occurred_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("snapshot_movements", e))?;
        let movements = movement_rows
            .iter()
            .map(movement_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(BackupSnapshot {
            version: BACKUP_VERSION.to_string(),
            date: Utc::now(),
            manufacturers,
            products,
            movements,
        })
    }
}

fn get<'r, T>(row: &'r PgRow, column: &str) -> Result<T, StoreError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(column)
        .map_err(|e| StoreError::Database(format!("failed to read column '{column}': {e}")))
}

fn manufacturer_from_row(row: &PgRow) -> Result<Manufacturer, StoreError> {
    Ok(Manufacturer {
        id: ManufacturerId::from_uuid(get(row, "id")?),
        name: get(row, "name")?,
    })
}

fn product_from_row(row: &PgRow) -> Result<Product, StoreError> {
    Ok(Product {
        id: ProductId::from_uuid(get(row, "id")?),
        name: get(row, "name")?,
        manufacturer_id: ManufacturerId::from_uuid(get(row, "manufacturer_id")?),
        stock: get(row, "stock")?,
    })
}

fn movement_from_row(row: &PgRow) -> Result<Movement, StoreError> {
    Ok(Movement {
        id: MovementId::from_uuid(get(row, "id")?),
        product_id: ProductId::from_uuid(get(row, "product_id")?),
        kind: kind_from_column(&get::<String>(row, "kind")?)?,
        quantity: get(row, "quantity")?,
        occurred_at: get::<DateTime<Utc>>(row, "occurred_at")?,
        notes: get(row, "notes")?,
    })
}

fn kind_from_column(value: &str) -> Result<MovementKind, StoreError> {
    MovementKind::from_str(value)
        .map_err(|e| StoreError::Database(format!("corrupt movement kind: {e}")))
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("{operation}: {}", db_err.message());
            match db_err.code().as_deref() {
                // Unique violation / check constraint violation.
                Some("23505") | Some("23514") => StoreError::Constraint(msg),
                _ => StoreError::Database(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Database(format!("connection pool closed in {operation}"))
        }
        other => StoreError::Database(format!("{operation}: {other}")),
    }
}
