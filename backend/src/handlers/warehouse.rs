//! Warehouse handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::warehouse::{CreateWarehouseInput, Warehouse};
use crate::services::WarehouseService;
use crate::AppState;

#[derive(Deserialize)]
pub struct RenameWarehouseRequest {
    pub name: String,
}

#[derive(Deserialize)]
pub struct ChangeAddressRequest {
    pub address: String,
}

pub async fn create_warehouse(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(input): Json<CreateWarehouseInput>,
) -> AppResult<(StatusCode, Json<Warehouse>)> {
    let service = WarehouseService::new(state.db);
    let warehouse = service.create_warehouse(input).await?;
    Ok((StatusCode::CREATED, Json(warehouse)))
}

pub async fn get_warehouse(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(warehouse_id): Path<Uuid>,
) -> AppResult<Json<Warehouse>> {
    let service = WarehouseService::new(state.db);
    let warehouse = service.get_warehouse(warehouse_id).await?;
    Ok(Json(warehouse))
}

pub async fn list_warehouses(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<Warehouse>>> {
    let service = WarehouseService::new(state.db);
    let warehouses = service.list_warehouses().await?;
    Ok(Json(warehouses))
}

pub async fn rename_warehouse(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(warehouse_id): Path<Uuid>,
    Json(body): Json<RenameWarehouseRequest>,
) -> AppResult<Json<Warehouse>> {
    let service = WarehouseService::new(state.db);
    let warehouse = service.rename_warehouse(warehouse_id, &body.name).await?;
    Ok(Json(warehouse))
}

pub async fn change_warehouse_address(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(warehouse_id): Path<Uuid>,
    Json(body): Json<ChangeAddressRequest>,
) -> AppResult<Json<Warehouse>> {
    let service = WarehouseService::new(state.db);
    let warehouse = service.change_address(warehouse_id, &body.address).await?;
    Ok(Json(warehouse))
}
