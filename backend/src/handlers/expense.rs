//! Expense handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::expense::{Expense, RecordExpenseInput};
use crate::services::ExpenseService;
use crate::AppState;
use shared::types::DateRange;

#[derive(Deserialize)]
pub struct ExpenseRangeQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Record an expense
pub async fn record_expense(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<RecordExpenseInput>,
) -> AppResult<(StatusCode, Json<Expense>)> {
    let service = ExpenseService::new(state.db);
    let expense = service.record_expense(current_user.0.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

pub async fn get_expense(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(expense_id): Path<Uuid>,
) -> AppResult<Json<Expense>> {
    let service = ExpenseService::new(state.db);
    let expense = service.get_expense(expense_id).await?;
    Ok(Json(expense))
}

/// Expenses dated within an inclusive range
pub async fn list_expenses_in_range(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<ExpenseRangeQuery>,
) -> AppResult<Json<Vec<Expense>>> {
    let service = ExpenseService::new(state.db);
    let expenses = service
        .get_in_range(DateRange {
            start: query.start,
            end: query.end,
        })
        .await?;
    Ok(Json(expenses))
}

pub async fn delete_expense(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(expense_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = ExpenseService::new(state.db);
    service.delete_expense(expense_id).await?;
    Ok(Json(()))
}
