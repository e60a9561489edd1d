//! Category handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::category::{Category, CreateCategoryInput};
use crate::services::CategoryService;
use crate::AppState;

#[derive(Deserialize)]
pub struct RenameCategoryRequest {
    pub name: String,
}

pub async fn create_category(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(input): Json<CreateCategoryInput>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let service = CategoryService::new(state.db);
    let category = service.create_category(input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn get_category(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(category_id): Path<Uuid>,
) -> AppResult<Json<Category>> {
    let service = CategoryService::new(state.db);
    let category = service.get_category(category_id).await?;
    Ok(Json(category))
}

pub async fn list_categories(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<Category>>> {
    let service = CategoryService::new(state.db);
    let categories = service.list_categories().await?;
    Ok(Json(categories))
}

pub async fn rename_category(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(category_id): Path<Uuid>,
    Json(body): Json<RenameCategoryRequest>,
) -> AppResult<Json<Category>> {
    let service = CategoryService::new(state.db);
    let category = service.rename_category(category_id, &body.name).await?;
    Ok(Json(category))
}
