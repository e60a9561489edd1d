//! Parameter store service
//!
//! Named accounting parameters back every accrual in the system: rates
//! (VAT, gross margin), the indirect/direct cost ratio, and the running
//! accumulators updated as a side effect of transactions and expenses.
//! A key may exist with a NULL value; that is distinct from the key being
//! absent.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};

use crate::error::{AppError, AppResult};

/// Parameter store over the `params` table
#[derive(Clone)]
pub struct ParamService {
    db: PgPool,
}

/// A named accounting parameter
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Param {
    pub key: String,
    pub value: Option<Decimal>,
    pub description: Option<String>,
}

/// Input for creating a parameter
#[derive(Debug, Deserialize)]
pub struct SetParamInput {
    pub key: String,
    pub value: Option<Decimal>,
    pub description: Option<String>,
}

impl ParamService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a parameter; the key is immutable once created
    pub async fn set_param(&self, input: SetParamInput) -> AppResult<Param> {
        if input.key.trim().is_empty() {
            return Err(AppError::validation("key", "Parameter key cannot be empty"));
        }

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM params WHERE key = $1)",
        )
        .bind(&input.key)
        .fetch_one(&self.db)
        .await?;

        if exists {
            return Err(AppError::DuplicateKey("parameter key".to_string()));
        }

        let param = sqlx::query_as::<_, Param>(
            r#"
            INSERT INTO params (key, value, description)
            VALUES ($1, $2, $3)
            RETURNING key, value, description
            "#,
        )
        .bind(&input.key)
        .bind(input.value)
        .bind(&input.description)
        .fetch_one(&self.db)
        .await?;

        Ok(param)
    }

    /// Point read; absence of the key is an error, a NULL value is not
    pub async fn get_param(&self, key: &str) -> AppResult<Param> {
        sqlx::query_as::<_, Param>(
            "SELECT key, value, description FROM params WHERE key = $1",
        )
        .bind(key)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Parameter {}", key)))
    }

    pub async fn list_params(&self) -> AppResult<Vec<Param>> {
        let params = sqlx::query_as::<_, Param>(
            "SELECT key, value, description FROM params ORDER BY key",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(params)
    }

    /// Overwrite the value of an existing parameter
    pub async fn update_param(&self, key: &str, value: Option<Decimal>) -> AppResult<Param> {
        sqlx::query_as::<_, Param>(
            r#"
            UPDATE params
            SET value = $2
            WHERE key = $1
            RETURNING key, value, description
            "#,
        )
        .bind(key)
        .bind(value)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Parameter {}", key)))
    }

    /// Atomic increment-by-delta; a NULL current value counts as zero, so
    /// the first increment writes the delta itself
    pub async fn increment_param(&self, key: &str, delta: Decimal) -> AppResult<Param> {
        let mut tx = self.db.begin().await?;
        let param = increment_in_tx(&mut tx, key, delta).await?;
        tx.commit().await?;
        Ok(param)
    }
}

/// Increment a parameter inside the caller's transaction. This is the only
/// parameter mutation invoked from transaction and expense processing; it
/// commits or rolls back with the enclosing operation.
pub(crate) async fn increment_in_tx(
    conn: &mut PgConnection,
    key: &str,
    delta: Decimal,
) -> AppResult<Param> {
    sqlx::query_as::<_, Param>(
        r#"
        UPDATE params
        SET value = COALESCE(value, 0) + $2
        WHERE key = $1
        RETURNING key, value, description
        "#,
    )
    .bind(key)
    .bind(delta)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Parameter {}", key)))
}

/// Read a set of parameters that must all exist and carry values.
///
/// One statement, so every value comes from the same snapshot: reading the
/// accumulators key by key would let a concurrent accrual commit between
/// reads and hand the caller mismatched figures. The rows are locked in key
/// order; every writer that touches more than one parameter row follows the
/// same order.
///
/// Returns the values in the order the keys were requested.
pub(crate) async fn read_required_many(
    conn: &mut PgConnection,
    keys: &[&str],
) -> AppResult<Vec<Decimal>> {
    let requested: Vec<String> = keys.iter().map(|k| k.to_string()).collect();

    let rows: Vec<(String, Option<Decimal>)> = sqlx::query_as(
        "SELECT key, value FROM params WHERE key = ANY($1) ORDER BY key FOR UPDATE",
    )
    .bind(&requested)
    .fetch_all(conn)
    .await?;

    let mut found: HashMap<String, Decimal> = HashMap::with_capacity(rows.len());
    for (key, value) in rows {
        if let Some(value) = value {
            found.insert(key, value);
        }
    }

    keys.iter()
        .map(|key| {
            found
                .get(*key)
                .copied()
                .ok_or_else(|| AppError::MissingParameter((*key).to_string()))
        })
        .collect()
}

/// Overwrite a parameter inside the caller's transaction; the key must
/// already be seeded
pub(crate) async fn write_value_in_tx(
    conn: &mut PgConnection,
    key: &str,
    value: Decimal,
) -> AppResult<()> {
    let result = sqlx::query("UPDATE params SET value = $2 WHERE key = $1")
        .bind(key)
        .bind(value)
        .execute(conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::MissingParameter(key.to_string()));
    }

    Ok(())
}
