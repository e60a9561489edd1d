//! Product handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::product::{CreateProductInput, Product};
use crate::services::ProductService;
use crate::AppState;

#[derive(Deserialize)]
pub struct RenameRequest {
    pub name: String,
}

#[derive(Deserialize)]
pub struct PromoteLotRequest {
    pub lot_id: Uuid,
}

/// Create a product
pub async fn create_product(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(input): Json<CreateProductInput>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let service = ProductService::new(state.db);
    let product = service.create_product(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn get_product(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.db);
    let product = service.get_product(product_id).await?;
    Ok(Json(product))
}

pub async fn list_products(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<Product>>> {
    let service = ProductService::new(state.db);
    let products = service.list_products().await?;
    Ok(Json(products))
}

pub async fn rename_product(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
    Json(body): Json<RenameRequest>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.db);
    let product = service.rename_product(product_id, &body.name).await?;
    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = ProductService::new(state.db);
    service.delete_product(product_id).await?;
    Ok(Json(()))
}

/// Point the product's active-lot pointer at a specific lot
pub async fn promote_lot(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
    Json(body): Json<PromoteLotRequest>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.db);
    let product = service.promote_lot(product_id, body.lot_id).await?;
    Ok(Json(product))
}

/// Re-derive the active-lot pointer from the oldest lot with stock
pub async fn advance_active_lot(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Option<Uuid>>> {
    let service = ProductService::new(state.db);
    let next = service.advance_active_lot(product_id).await?;
    Ok(Json(next))
}
