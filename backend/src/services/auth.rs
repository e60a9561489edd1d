//! Authentication and user management service
//!
//! Login/password accounts with a flat role model. Password hashes never
//! leave this module; callers get `UserInfo` projections.

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use shared::validation::{validate_login, validate_password};

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    jwt_secret: String,
    access_token_expiry: i64,
}

/// A role row
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
}

/// User projection handed out to callers; never carries the hash
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserInfo {
    pub id: Uuid,
    pub login: String,
    pub role_id: Uuid,
}

/// Internal row including the hash, for verification only
#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    login: String,
    password_hash: String,
    role_id: Uuid,
}

/// Input for creating a user account
#[derive(Debug, Deserialize)]
pub struct CreateUserInput {
    pub login: String,
    pub password: String,
    pub role_id: Uuid,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID
    pub login: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Tokens returned on successful login
#[derive(Debug, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl AuthService {
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            jwt_secret: config.jwt.secret.clone(),
            access_token_expiry: config.jwt.access_token_expiry,
        }
    }

    /// Create a user account with a bcrypt-hashed password
    pub async fn create_user(&self, input: CreateUserInput) -> AppResult<UserInfo> {
        validate_login(&input.login).map_err(|m| AppError::validation("login", m))?;
        validate_password(&input.password).map_err(|m| AppError::validation("password", m))?;

        let role_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM roles WHERE id = $1)")
                .bind(input.role_id)
                .fetch_one(&self.db)
                .await?;

        if !role_exists {
            return Err(AppError::NotFound("Role".to_string()));
        }

        let login_taken =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE login = $1)")
                .bind(input.login.trim())
                .fetch_one(&self.db)
                .await?;

        if login_taken {
            return Err(AppError::DuplicateKey("login".to_string()));
        }

        let password_hash = hash(&input.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let user = sqlx::query_as::<_, UserInfo>(
            r#"
            INSERT INTO users (login, password_hash, role_id)
            VALUES ($1, $2, $3)
            RETURNING id, login, role_id
            "#,
        )
        .bind(input.login.trim())
        .bind(&password_hash)
        .bind(input.role_id)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(user_id = %user.id, login = %user.login, "user created");
        Ok(user)
    }

    pub async fn get_by_login(&self, login: &str) -> AppResult<UserInfo> {
        sqlx::query_as::<_, UserInfo>("SELECT id, login, role_id FROM users WHERE login = $1")
            .bind(login)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("User".to_string()))
    }

    pub async fn list_users(&self) -> AppResult<Vec<UserInfo>> {
        let users =
            sqlx::query_as::<_, UserInfo>("SELECT id, login, role_id FROM users ORDER BY login")
                .fetch_all(&self.db)
                .await?;

        Ok(users)
    }

    pub async fn update_password(&self, user_id: Uuid, new_password: &str) -> AppResult<()> {
        validate_password(new_password).map_err(|m| AppError::validation("password", m))?;

        let password_hash = hash(new_password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(user_id)
            .bind(&password_hash)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User".to_string()));
        }

        Ok(())
    }

    pub async fn update_role(&self, user_id: Uuid, role_id: Uuid) -> AppResult<UserInfo> {
        let role_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM roles WHERE id = $1)")
                .bind(role_id)
                .fetch_one(&self.db)
                .await?;

        if !role_exists {
            return Err(AppError::NotFound("Role".to_string()));
        }

        sqlx::query_as::<_, UserInfo>(
            "UPDATE users SET role_id = $2 WHERE id = $1 RETURNING id, login, role_id",
        )
        .bind(user_id)
        .bind(role_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))
    }

    pub async fn delete_user(&self, user_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User".to_string()));
        }

        Ok(())
    }

    /// Authenticate with login and password; issue a bearer token on success.
    /// Unknown login and wrong password report the same error.
    pub async fn login(&self, login: &str, password: &str) -> AppResult<AuthTokens> {
        let user = sqlx::query_as::<_, UserRow>(
            "SELECT id, login, password_hash, role_id FROM users WHERE login = $1",
        )
        .bind(login)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

        let valid = verify(password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;

        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        let role_name =
            sqlx::query_scalar::<_, String>("SELECT name FROM roles WHERE id = $1")
                .bind(user.role_id)
                .fetch_one(&self.db)
                .await?;

        let tokens = self.generate_tokens(user.id, &user.login, &role_name)?;

        tracing::info!(user_id = %user.id, login = %user.login, "user logged in");
        Ok(tokens)
    }

    pub async fn list_roles(&self) -> AppResult<Vec<Role>> {
        let roles = sqlx::query_as::<_, Role>("SELECT id, name FROM roles ORDER BY name")
            .fetch_all(&self.db)
            .await?;

        Ok(roles)
    }

    fn generate_tokens(&self, user_id: Uuid, login: &str, role: &str) -> AppResult<AuthTokens> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.access_token_expiry);

        let claims = Claims {
            sub: user_id.to_string(),
            login: login.to_string(),
            role: role.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        let access_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

        Ok(AuthTokens {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
        })
    }
}
