//! Lot handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::lot::{CreateLotInput, Lot};
use crate::services::LotService;
use crate::AppState;

#[derive(Deserialize)]
pub struct MoveWarehouseRequest {
    pub warehouse_id: Uuid,
}

/// Create a lot and book its arrival
pub async fn create_lot(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateLotInput>,
) -> AppResult<(StatusCode, Json<Lot>)> {
    let service = LotService::new(state.db);
    let lot = service.create_lot(current_user.0.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(lot)))
}

pub async fn get_lot(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(lot_id): Path<Uuid>,
) -> AppResult<Json<Lot>> {
    let service = LotService::new(state.db);
    let lot = service.get_lot(lot_id).await?;
    Ok(Json(lot))
}

/// All lots of a product, oldest first
pub async fn get_product_lots(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Vec<Lot>>> {
    let service = LotService::new(state.db);
    let lots = service.list_by_product(product_id).await?;
    Ok(Json(lots))
}

/// Reassign a lot to another warehouse
pub async fn move_lot_warehouse(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(lot_id): Path<Uuid>,
    Json(body): Json<MoveWarehouseRequest>,
) -> AppResult<Json<Lot>> {
    let service = LotService::new(state.db);
    let lot = service.move_warehouse(lot_id, body.warehouse_id).await?;
    Ok(Json(lot))
}
