//! Product ledger service
//!
//! Per-product aggregate state: the on-hand total across all lots and the
//! pointer to the lot currently consumed by outgoing transactions. The
//! pointer is a cached index over the lots; `advance_active_lot` re-derives
//! it with the FIFO query at any time.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::validation::validate_name;

/// Product ledger over the `products` table
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

/// A product and its aggregate stock state
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub category_id: Uuid,
    pub total_quantity: i32,
    pub active_lot_id: Option<Uuid>,
}

/// Input for creating a product
#[derive(Debug, Deserialize)]
pub struct CreateProductInput {
    pub name: String,
    pub category_id: Uuid,
}

const PRODUCT_COLUMNS: &str = "id, name, category_id, total_quantity, active_lot_id";

impl ProductService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a product with zero stock and no active lot
    pub async fn create_product(&self, input: CreateProductInput) -> AppResult<Product> {
        validate_name(&input.name).map_err(|m| AppError::validation("name", m))?;

        let category_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)",
        )
        .bind(input.category_id)
        .fetch_one(&self.db)
        .await?;

        if !category_exists {
            return Err(AppError::NotFound("Category".to_string()));
        }

        let name_taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE name = $1)",
        )
        .bind(input.name.trim())
        .fetch_one(&self.db)
        .await?;

        if name_taken {
            return Err(AppError::DuplicateKey("product name".to_string()));
        }

        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (name, category_id)
            VALUES ($1, $2)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(input.name.trim())
        .bind(input.category_id)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(product_id = %product.id, name = %product.name, "product created");
        Ok(product)
    }

    pub async fn get_product(&self, id: Uuid) -> AppResult<Product> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))
    }

    pub async fn list_products(&self) -> AppResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(products)
    }

    pub async fn rename_product(&self, id: Uuid, new_name: &str) -> AppResult<Product> {
        validate_name(new_name).map_err(|m| AppError::validation("name", m))?;

        let name_taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE name = $1 AND id <> $2)",
        )
        .bind(new_name.trim())
        .bind(id)
        .fetch_one(&self.db)
        .await?;

        if name_taken {
            return Err(AppError::DuplicateKey("product name".to_string()));
        }

        sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET name = $2
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(new_name.trim())
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))
    }

    /// Delete a product; fails while lots still reference it
    pub async fn delete_product(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product".to_string()));
        }

        Ok(())
    }

    /// Guarded total-quantity adjustment; never lets the total go negative
    pub async fn adjust_total_quantity(&self, product_id: Uuid, delta: i32) -> AppResult<i32> {
        let mut tx = self.db.begin().await?;
        lock_product(&mut tx, product_id).await?;
        let total = adjust_total_locked(&mut tx, product_id, delta).await?;
        tx.commit().await?;
        Ok(total)
    }

    /// Point the product at a specific lot; the lot must belong to the
    /// product and still hold stock
    pub async fn promote_lot(&self, product_id: Uuid, lot_id: Uuid) -> AppResult<Product> {
        let lot = sqlx::query_as::<_, (Uuid, i32)>(
            "SELECT product_id, remaining_quantity FROM lots WHERE id = $1",
        )
        .bind(lot_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Lot".to_string()))?;

        if lot.0 != product_id {
            return Err(AppError::validation(
                "lot_id",
                "Lot belongs to a different product",
            ));
        }
        if lot.1 == 0 {
            return Err(AppError::validation("lot_id", "Lot is exhausted"));
        }

        sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET active_lot_id = $2
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(product_id)
        .bind(lot_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))
    }

    /// Re-derive the active-lot pointer from the FIFO query
    pub async fn advance_active_lot(&self, product_id: Uuid) -> AppResult<Option<Uuid>> {
        let mut tx = self.db.begin().await?;
        lock_product(&mut tx, product_id).await?;
        let next = advance_active_lot_locked(&mut tx, product_id).await?;
        tx.commit().await?;
        Ok(next)
    }
}

/// Take the row lock that serializes quantity mutations for a product
pub(crate) async fn lock_product(conn: &mut PgConnection, product_id: Uuid) -> AppResult<Product> {
    sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1 FOR UPDATE"
    ))
    .bind(product_id)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| AppError::NotFound("Product".to_string()))
}

/// Adjust the aggregate total under the caller's row lock. The WHERE guard
/// rejects any delta that would drive the total below zero.
pub(crate) async fn adjust_total_locked(
    conn: &mut PgConnection,
    product_id: Uuid,
    delta: i32,
) -> AppResult<i32> {
    let total = sqlx::query_scalar::<_, i32>(
        r#"
        UPDATE products
        SET total_quantity = total_quantity + $2
        WHERE id = $1 AND total_quantity + $2 >= 0
        RETURNING total_quantity
        "#,
    )
    .bind(product_id)
    .bind(delta)
    .fetch_optional(&mut *conn)
    .await?;

    match total {
        Some(total) => Ok(total),
        None => {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)",
            )
            .bind(product_id)
            .fetch_one(conn)
            .await?;

            if exists {
                Err(AppError::NegativeQuantity(format!(
                    "adjusting product {} by {} would make its total negative",
                    product_id, delta
                )))
            } else {
                Err(AppError::NotFound("Product".to_string()))
            }
        }
    }
}

/// Advance the pointer to the oldest lot that still holds stock, or NULL
/// when every lot is exhausted. Strict chronological FIFO; ties broken by id
/// for determinism.
pub(crate) async fn advance_active_lot_locked(
    conn: &mut PgConnection,
    product_id: Uuid,
) -> AppResult<Option<Uuid>> {
    let next = sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT id
        FROM lots
        WHERE product_id = $1 AND remaining_quantity > 0
        ORDER BY created_at ASC, id ASC
        LIMIT 1
        "#,
    )
    .bind(product_id)
    .fetch_optional(&mut *conn)
    .await?;

    let result = sqlx::query("UPDATE products SET active_lot_id = $2 WHERE id = $1")
        .bind(product_id)
        .bind(next)
        .execute(conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Product".to_string()));
    }

    Ok(next)
}
