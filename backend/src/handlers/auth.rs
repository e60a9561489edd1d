//! Authentication and user management handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::auth::{AuthTokens, CreateUserInput, Role, UserInfo};
use crate::services::AuthService;
use crate::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct UpdatePasswordRequest {
    pub password: String,
}

#[derive(Deserialize)]
pub struct UpdateRoleRequest {
    pub role_id: Uuid,
}

/// Login endpoint handler (public)
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<AuthTokens>> {
    let service = AuthService::new(state.db.clone(), &state.config);
    let tokens = service.login(&body.login, &body.password).await?;
    Ok(Json(tokens))
}

/// Create a user account (admin only)
pub async fn create_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateUserInput>,
) -> AppResult<(StatusCode, Json<UserInfo>)> {
    require_admin(&current_user)?;
    let service = AuthService::new(state.db.clone(), &state.config);
    let user = service.create_user(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// List all user accounts (admin only)
pub async fn list_users(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<UserInfo>>> {
    require_admin(&current_user)?;
    let service = AuthService::new(state.db.clone(), &state.config);
    let users = service.list_users().await?;
    Ok(Json(users))
}

/// Look up a user by login (admin only)
pub async fn get_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(login): Path<String>,
) -> AppResult<Json<UserInfo>> {
    require_admin(&current_user)?;
    let service = AuthService::new(state.db.clone(), &state.config);
    let user = service.get_by_login(&login).await?;
    Ok(Json(user))
}

/// Change a password; users may change their own, admins anyone's
pub async fn update_password(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(user_id): Path<Uuid>,
    Json(body): Json<UpdatePasswordRequest>,
) -> AppResult<Json<()>> {
    if current_user.0.user_id != user_id {
        require_admin(&current_user)?;
    }
    let service = AuthService::new(state.db.clone(), &state.config);
    service.update_password(user_id, &body.password).await?;
    Ok(Json(()))
}

/// Reassign a user's role (admin only)
pub async fn update_user_role(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(user_id): Path<Uuid>,
    Json(body): Json<UpdateRoleRequest>,
) -> AppResult<Json<UserInfo>> {
    require_admin(&current_user)?;
    let service = AuthService::new(state.db.clone(), &state.config);
    let user = service.update_role(user_id, body.role_id).await?;
    Ok(Json(user))
}

/// Delete a user account (admin only)
pub async fn delete_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    require_admin(&current_user)?;
    let service = AuthService::new(state.db.clone(), &state.config);
    service.delete_user(user_id).await?;
    Ok(Json(()))
}

/// List the available roles
pub async fn list_roles(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<Role>>> {
    let service = AuthService::new(state.db.clone(), &state.config);
    let roles = service.list_roles().await?;
    Ok(Json(roles))
}

fn require_admin(current_user: &CurrentUser) -> AppResult<()> {
    if current_user.0.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden("Admin role required".to_string()))
    }
}
