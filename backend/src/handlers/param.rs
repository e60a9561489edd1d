//! Accounting parameter handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::param::{Param, SetParamInput};
use crate::services::ParamService;
use crate::AppState;

#[derive(Deserialize)]
pub struct UpdateParamRequest {
    pub value: Option<Decimal>,
}

#[derive(Deserialize)]
pub struct IncrementParamRequest {
    pub delta: Decimal,
}

/// Create an accounting parameter
pub async fn create_param(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(input): Json<SetParamInput>,
) -> AppResult<(StatusCode, Json<Param>)> {
    let service = ParamService::new(state.db);
    let param = service.set_param(input).await?;
    Ok((StatusCode::CREATED, Json(param)))
}

/// Read one parameter by key
pub async fn get_param(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(key): Path<String>,
) -> AppResult<Json<Param>> {
    let service = ParamService::new(state.db);
    let param = service.get_param(&key).await?;
    Ok(Json(param))
}

/// List every parameter
pub async fn list_params(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<Param>>> {
    let service = ParamService::new(state.db);
    let params = service.list_params().await?;
    Ok(Json(params))
}

/// Overwrite a parameter's value
pub async fn update_param(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(key): Path<String>,
    Json(body): Json<UpdateParamRequest>,
) -> AppResult<Json<Param>> {
    let service = ParamService::new(state.db);
    let param = service.update_param(&key, body.value).await?;
    Ok(Json(param))
}

/// Atomically add a delta to a parameter's value
pub async fn increment_param(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(key): Path<String>,
    Json(body): Json<IncrementParamRequest>,
) -> AppResult<Json<Param>> {
    let service = ParamService::new(state.db);
    let param = service.increment_param(&key, body.delta).await?;
    Ok(Json(param))
}
