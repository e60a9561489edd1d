//! Expense ledger service
//!
//! Costed entries (rent, salaries, utilities) that feed the IndirectCosts
//! accumulator. The insert and the accrual commit together.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::param;
use shared::params;
use shared::types::DateRange;
use shared::validation::{validate_name, validate_positive_money};

/// Expense ledger over the `expenses` table
#[derive(Clone)]
pub struct ExpenseService {
    db: PgPool,
}

/// A costed expense entry
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Expense {
    pub id: Uuid,
    pub name: String,
    pub cost: Decimal,
    pub user_id: Uuid,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for recording an expense
#[derive(Debug, Deserialize)]
pub struct RecordExpenseInput {
    pub name: String,
    pub cost: Decimal,
    pub description: Option<String>,
}

const EXPENSE_COLUMNS: &str = "id, name, cost, user_id, description, created_at";

impl ExpenseService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record an expense and accrue it into IndirectCosts atomically
    pub async fn record_expense(
        &self,
        user_id: Uuid,
        input: RecordExpenseInput,
    ) -> AppResult<Expense> {
        validate_name(&input.name).map_err(|m| AppError::validation("name", m))?;
        validate_positive_money(input.cost).map_err(|m| AppError::validation("cost", m))?;

        let mut tx = self.db.begin().await?;

        let expense = sqlx::query_as::<_, Expense>(&format!(
            r#"
            INSERT INTO expenses (name, cost, user_id, description)
            VALUES ($1, $2, $3, $4)
            RETURNING {EXPENSE_COLUMNS}
            "#
        ))
        .bind(input.name.trim())
        .bind(input.cost)
        .bind(user_id)
        .bind(&input.description)
        .fetch_one(&mut *tx)
        .await?;

        param::increment_in_tx(&mut tx, params::INDIRECT_COSTS, input.cost).await?;

        tx.commit().await?;

        tracing::info!(expense_id = %expense.id, cost = %expense.cost, "expense recorded");
        Ok(expense)
    }

    pub async fn get_expense(&self, id: Uuid) -> AppResult<Expense> {
        sqlx::query_as::<_, Expense>(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Expense".to_string()))
    }

    /// Expenses whose date falls inside the range, bounds inclusive
    pub async fn get_in_range(&self, range: DateRange) -> AppResult<Vec<Expense>> {
        if !range.is_valid() {
            return Err(AppError::validation("range", "Date range runs backwards"));
        }

        let expenses = sqlx::query_as::<_, Expense>(&format!(
            r#"
            SELECT {EXPENSE_COLUMNS}
            FROM expenses
            WHERE created_at::date BETWEEN $1 AND $2
            ORDER BY created_at ASC
            "#
        ))
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.db)
        .await?;

        Ok(expenses)
    }

    /// Delete an expense entry. The IndirectCosts accrual it made is NOT
    /// reversed; the accumulator keeps the cost until the next reset.
    pub async fn delete_expense(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Expense".to_string()));
        }

        Ok(())
    }
}
