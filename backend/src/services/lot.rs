//! Lot ledger service
//!
//! A lot is a batch of one product purchased at one price; it is the FIFO
//! cost layer of the system. Creating a lot derives its selling price from
//! the accounting parameters, promotes it when the product was out of stock,
//! and emits the PURCHASE transaction that makes the log the single source
//! of truth for every quantity movement.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::{param, product, transaction};
use shared::finance;
use shared::params;
use shared::types::TransactionKind;
use shared::validation::{validate_positive_money, validate_positive_quantity};

/// Lot ledger over the `lots` table
#[derive(Clone)]
pub struct LotService {
    db: PgPool,
}

/// A purchase lot
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Lot {
    pub id: Uuid,
    pub product_id: Uuid,
    pub purchase_price: Decimal,
    pub selling_price: Decimal,
    pub warehouse_id: Uuid,
    pub original_quantity: i32,
    pub remaining_quantity: i32,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a lot
#[derive(Debug, Deserialize)]
pub struct CreateLotInput {
    pub product_id: Uuid,
    pub purchase_price: Decimal,
    pub warehouse_id: Uuid,
    pub quantity: i32,
}

const LOT_COLUMNS: &str = "id, product_id, purchase_price, selling_price, warehouse_id, \
                           original_quantity, remaining_quantity, created_at";

impl LotService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Allocate a new lot and book its arrival.
    ///
    /// One transaction covers pricing, the insert, the active-lot promotion,
    /// the total-quantity bump, the PURCHASE log entry, and the DirectCosts
    /// accrual: a lot never exists without its movement record.
    pub async fn create_lot(&self, user_id: Uuid, input: CreateLotInput) -> AppResult<Lot> {
        validate_positive_money(input.purchase_price)
            .map_err(|m| AppError::validation("purchase_price", m))?;
        validate_positive_quantity(input.quantity)
            .map_err(|m| AppError::validation("quantity", m))?;

        let mut tx = self.db.begin().await?;

        let owner = product::lock_product(&mut tx, input.product_id).await?;

        let warehouse_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM warehouses WHERE id = $1)",
        )
        .bind(input.warehouse_id)
        .fetch_one(&mut *tx)
        .await?;

        if !warehouse_exists {
            return Err(AppError::NotFound("Warehouse".to_string()));
        }

        // One locked read keeps the three pricing rates on a single snapshot
        let rates = param::read_required_many(
            &mut tx,
            &[params::DIRECT_INDIRECT_RATIO, params::VAT, params::GROSS_MARGIN],
        )
        .await?;
        let (ratio, vat, gross_margin) = (rates[0], rates[1], rates[2]);

        let loaded_cost = finance::loaded_unit_cost(input.purchase_price, ratio);
        let selling_price = finance::selling_price(loaded_cost, gross_margin, vat)
            .map_err(|m| AppError::validation("pricing", m))?;

        let lot = sqlx::query_as::<_, Lot>(&format!(
            r#"
            INSERT INTO lots (product_id, purchase_price, selling_price, warehouse_id,
                              original_quantity, remaining_quantity)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING {LOT_COLUMNS}
            "#
        ))
        .bind(input.product_id)
        .bind(input.purchase_price)
        .bind(selling_price)
        .bind(input.warehouse_id)
        .bind(input.quantity)
        .fetch_one(&mut *tx)
        .await?;

        // First stock after a dry spell makes this the lot to consume next
        if owner.total_quantity == 0 {
            sqlx::query("UPDATE products SET active_lot_id = $2 WHERE id = $1")
                .bind(input.product_id)
                .bind(lot.id)
                .execute(&mut *tx)
                .await?;
        }

        product::adjust_total_locked(&mut tx, input.product_id, input.quantity).await?;

        transaction::append_in_tx(
            &mut tx,
            TransactionKind::Purchase,
            lot.id,
            input.quantity,
            user_id,
        )
        .await?;

        param::increment_in_tx(
            &mut tx,
            params::DIRECT_COSTS,
            input.purchase_price * Decimal::from(input.quantity),
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            lot_id = %lot.id,
            product_id = %lot.product_id,
            quantity = lot.original_quantity,
            selling_price = %lot.selling_price,
            "lot created"
        );

        Ok(lot)
    }

    pub async fn get_lot(&self, id: Uuid) -> AppResult<Lot> {
        sqlx::query_as::<_, Lot>(&format!("SELECT {LOT_COLUMNS} FROM lots WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Lot".to_string()))
    }

    /// All lots of a product, oldest first (consumption order)
    pub async fn list_by_product(&self, product_id: Uuid) -> AppResult<Vec<Lot>> {
        let product_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)",
        )
        .bind(product_id)
        .fetch_one(&self.db)
        .await?;

        if !product_exists {
            return Err(AppError::NotFound("Product".to_string()));
        }

        let lots = sqlx::query_as::<_, Lot>(&format!(
            r#"
            SELECT {LOT_COLUMNS}
            FROM lots
            WHERE product_id = $1
            ORDER BY created_at ASC, id ASC
            "#
        ))
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        Ok(lots)
    }

    /// Reassign a lot to another warehouse; a plain field update
    pub async fn move_warehouse(&self, lot_id: Uuid, warehouse_id: Uuid) -> AppResult<Lot> {
        let warehouse_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM warehouses WHERE id = $1)",
        )
        .bind(warehouse_id)
        .fetch_one(&self.db)
        .await?;

        if !warehouse_exists {
            return Err(AppError::NotFound("Warehouse".to_string()));
        }

        sqlx::query_as::<_, Lot>(&format!(
            r#"
            UPDATE lots
            SET warehouse_id = $2
            WHERE id = $1
            RETURNING {LOT_COLUMNS}
            "#
        ))
        .bind(lot_id)
        .bind(warehouse_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Lot".to_string()))
    }
}

/// Take the row lock on a lot before mutating its quantities
pub(crate) async fn lock_lot(conn: &mut PgConnection, lot_id: Uuid) -> AppResult<Lot> {
    sqlx::query_as::<_, Lot>(&format!(
        "SELECT {LOT_COLUMNS} FROM lots WHERE id = $1 FOR UPDATE"
    ))
    .bind(lot_id)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| AppError::NotFound("Lot".to_string()))
}

/// Consume stock from a locked lot: decrement the lot and the product's
/// aggregate together, and advance the active-lot pointer when the lot hits
/// exactly zero. The caller holds FOR UPDATE locks on both rows.
pub(crate) async fn consume_locked(
    conn: &mut PgConnection,
    lot: &Lot,
    quantity: i32,
) -> AppResult<()> {
    if quantity > lot.remaining_quantity {
        return Err(AppError::InsufficientStock {
            lot_id: lot.id,
            requested: quantity,
            available: lot.remaining_quantity,
        });
    }

    sqlx::query("UPDATE lots SET remaining_quantity = remaining_quantity - $2 WHERE id = $1")
        .bind(lot.id)
        .bind(quantity)
        .execute(&mut *conn)
        .await?;

    product::adjust_total_locked(conn, lot.product_id, -quantity).await?;

    if lot.remaining_quantity == quantity {
        product::advance_active_lot_locked(conn, lot.product_id).await?;
    }

    Ok(())
}
