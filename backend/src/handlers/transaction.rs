//! Transaction handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::transaction::{RecordTransactionInput, StockTransaction};
use crate::services::TransactionService;
use crate::AppState;
use shared::types::TransactionKind;

/// Record an inventory movement
pub async fn record_transaction(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<RecordTransactionInput>,
) -> AppResult<(StatusCode, Json<StockTransaction>)> {
    let service = TransactionService::new(state.db);
    let transaction = service.record(current_user.0.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

pub async fn list_transactions(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<StockTransaction>>> {
    let service = TransactionService::new(state.db);
    let transactions = service.list_all().await?;
    Ok(Json(transactions))
}

/// List movements of one kind ("sale", "purchase" or "write_off")
pub async fn list_transactions_by_type(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(tx_type): Path<String>,
) -> AppResult<Json<Vec<StockTransaction>>> {
    let kind = TransactionKind::from_str(&tx_type)
        .ok_or_else(|| AppError::validation("tx_type", "Unknown transaction type"))?;
    let service = TransactionService::new(state.db);
    let transactions = service.list_by_type(kind).await?;
    Ok(Json(transactions))
}

/// All movements touching a product's lots
pub async fn get_product_transactions(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Vec<StockTransaction>>> {
    let service = TransactionService::new(state.db);
    let transactions = service.list_by_product(product_id).await?;
    Ok(Json(transactions))
}

#[derive(Serialize)]
pub struct DeletedCountResponse {
    pub deleted: u64,
}

/// Bulk-delete a product's movement history
pub async fn delete_product_transactions(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<DeletedCountResponse>> {
    let service = TransactionService::new(state.db);
    let deleted = service.delete_by_product(product_id).await?;
    Ok(Json(DeletedCountResponse { deleted }))
}
