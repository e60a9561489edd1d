//! Transaction log service
//!
//! The append-only record of every inventory movement. Recording an
//! outgoing movement (sale or write-off) is the single mutation path that
//! consumes lot stock and accrues the financial accumulators; everything
//! happens inside one database transaction under row locks on the lot and
//! its product, so two concurrent movements against the same lot serialize
//! and oversell is impossible.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::{lot, param};
use shared::params;
use shared::types::TransactionKind;
use shared::validation::validate_positive_quantity;

/// Transaction log over the `transactions` table
#[derive(Clone)]
pub struct TransactionService {
    db: PgPool,
}

/// A recorded inventory movement
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StockTransaction {
    pub id: Uuid,
    pub tx_type: String,
    pub lot_id: Uuid,
    pub quantity: i32,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Input for recording a movement
#[derive(Debug, Deserialize)]
pub struct RecordTransactionInput {
    pub tx_type: TransactionKind,
    pub lot_id: Uuid,
    pub quantity: i32,
}

const TRANSACTION_COLUMNS: &str = "id, tx_type, lot_id, quantity, user_id, created_at";

impl TransactionService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record a movement against a lot.
    ///
    /// The log row is appended first; sales and write-offs then consume the
    /// lot, and the type-specific accumulators accrue. Any failure rolls the
    /// whole operation back.
    pub async fn record(
        &self,
        user_id: Uuid,
        input: RecordTransactionInput,
    ) -> AppResult<StockTransaction> {
        validate_positive_quantity(input.quantity)
            .map_err(|m| AppError::validation("quantity", m))?;

        let mut tx = self.db.begin().await?;

        // Lock order is lot first, then product, same as lot creation
        let lot = lot::lock_lot(&mut tx, input.lot_id).await?;
        crate::services::product::lock_product(&mut tx, lot.product_id).await?;

        let record =
            append_in_tx(&mut tx, input.tx_type, lot.id, input.quantity, user_id).await?;

        if input.tx_type.is_outgoing() {
            lot::consume_locked(&mut tx, &lot, input.quantity).await?;
        }

        let quantity = Decimal::from(input.quantity);
        // Parameter rows are touched in key order everywhere a transaction
        // holds more than one, matching the sorted lock order of
        // read_required_many
        match input.tx_type {
            TransactionKind::Sale => {
                param::increment_in_tx(
                    &mut tx,
                    params::DIRECT_SOLD_COSTS,
                    lot.purchase_price * quantity,
                )
                .await?;
                param::increment_in_tx(&mut tx, params::REVENUE, lot.selling_price * quantity)
                    .await?;
            }
            TransactionKind::Purchase => {
                param::increment_in_tx(
                    &mut tx,
                    params::DIRECT_COSTS,
                    lot.purchase_price * quantity,
                )
                .await?;
            }
            TransactionKind::WriteOff => {
                param::increment_in_tx(
                    &mut tx,
                    params::INDIRECT_COSTS,
                    lot.purchase_price * quantity,
                )
                .await?;
            }
        }

        tx.commit().await?;

        tracing::info!(
            transaction_id = %record.id,
            tx_type = %input.tx_type,
            lot_id = %lot.id,
            quantity = input.quantity,
            "transaction recorded"
        );

        Ok(record)
    }

    /// All movements touching a product's lots, newest first
    pub async fn list_by_product(&self, product_id: Uuid) -> AppResult<Vec<StockTransaction>> {
        let product_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)",
        )
        .bind(product_id)
        .fetch_one(&self.db)
        .await?;

        if !product_exists {
            return Err(AppError::NotFound("Product".to_string()));
        }

        let transactions = sqlx::query_as::<_, StockTransaction>(
            r#"
            SELECT t.id, t.tx_type, t.lot_id, t.quantity, t.user_id, t.created_at
            FROM transactions t
            JOIN lots l ON l.id = t.lot_id
            WHERE l.product_id = $1
            ORDER BY t.created_at DESC, t.id DESC
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        Ok(transactions)
    }

    pub async fn list_by_type(&self, tx_type: TransactionKind) -> AppResult<Vec<StockTransaction>> {
        let transactions = sqlx::query_as::<_, StockTransaction>(&format!(
            r#"
            SELECT {TRANSACTION_COLUMNS}
            FROM transactions
            WHERE tx_type = $1
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(tx_type.as_str())
        .fetch_all(&self.db)
        .await?;

        Ok(transactions)
    }

    pub async fn list_all(&self) -> AppResult<Vec<StockTransaction>> {
        let transactions = sqlx::query_as::<_, StockTransaction>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(transactions)
    }

    /// Administrative bulk delete of a product's movement history, for data
    /// resets. Deliberately does NOT reverse quantity or accumulator side
    /// effects; the accumulators keep whatever these transactions accrued.
    pub async fn delete_by_product(&self, product_id: Uuid) -> AppResult<u64> {
        let product_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)",
        )
        .bind(product_id)
        .fetch_one(&self.db)
        .await?;

        if !product_exists {
            return Err(AppError::NotFound("Product".to_string()));
        }

        let result = sqlx::query(
            r#"
            DELETE FROM transactions t
            USING lots l
            WHERE t.lot_id = l.id AND l.product_id = $1
            "#,
        )
        .bind(product_id)
        .execute(&self.db)
        .await?;

        tracing::warn!(
            product_id = %product_id,
            deleted = result.rows_affected(),
            "bulk-deleted transaction history"
        );

        Ok(result.rows_affected())
    }
}

/// Append a log row inside the caller's transaction
pub(crate) async fn append_in_tx(
    conn: &mut PgConnection,
    tx_type: TransactionKind,
    lot_id: Uuid,
    quantity: i32,
    user_id: Uuid,
) -> AppResult<StockTransaction> {
    let record = sqlx::query_as::<_, StockTransaction>(&format!(
        r#"
        INSERT INTO transactions (tx_type, lot_id, quantity, user_id)
        VALUES ($1, $2, $3, $4)
        RETURNING {TRANSACTION_COLUMNS}
        "#
    ))
    .bind(tx_type.as_str())
    .bind(lot_id)
    .bind(quantity)
    .bind(user_id)
    .fetch_one(conn)
    .await?;

    Ok(record)
}
