//! Error handling for the StockLedger backend
//!
//! Every failure a service can surface maps to a specific kind; mutating
//! operations never commit partial state, so an error response always means
//! the operation did not happen.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Business logic errors
    #[error("Insufficient stock in lot {lot_id}: requested {requested}, available {available}")]
    InsufficientStock {
        lot_id: uuid::Uuid,
        requested: i32,
        available: i32,
    },

    #[error("Negative quantity: {0}")]
    NegativeQuantity(String),

    #[error("Missing parameter: {0}")]
    MissingParameter(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail {
                    code: "INVALID_CREDENTIALS".to_string(),
                    message: "Invalid login or password".to_string(),
                    field: None,
                },
            ),
            AppError::Forbidden(msg) => (
                StatusCode::FORBIDDEN,
                ErrorDetail {
                    code: "FORBIDDEN".to_string(),
                    message: msg.clone(),
                    field: None,
                },
            ),
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: message.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::DuplicateKey(what) => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "DUPLICATE_KEY".to_string(),
                    message: format!("A record with this {} already exists", what),
                    field: Some(what.clone()),
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message: format!("{} not found", resource),
                    field: None,
                },
            ),
            AppError::InsufficientStock { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "INSUFFICIENT_STOCK".to_string(),
                    message: self.to_string(),
                    field: None,
                },
            ),
            AppError::NegativeQuantity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "NEGATIVE_QUANTITY".to_string(),
                    message: msg.clone(),
                    field: None,
                },
            ),
            AppError::MissingParameter(key) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "MISSING_PARAMETER".to_string(),
                    message: format!("Accounting parameter {} is not initialized", key),
                    field: None,
                },
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "DATABASE_ERROR".to_string(),
                    message: "A database error occurred".to_string(),
                    field: None,
                },
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: msg.clone(),
                    field: None,
                },
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred".to_string(),
                    field: None,
                },
            ),
        };

        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for services and handlers
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Lift a `&'static str` validation failure onto a named field
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Unique-violation (SQLSTATE 23505) surfaces as `DuplicateKey` rather than
/// a generic database error. The services pre-check with EXISTS for the
/// friendly field message; this catches the race where two inserts pass the
/// pre-check together.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some("23505") {
                return AppError::DuplicateKey(constraint_subject(db_err.constraint()));
            }
        }
        AppError::DatabaseError(err)
    }
}

fn constraint_subject(constraint: Option<&str>) -> String {
    constraint.unwrap_or("unique key").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_stays_a_database_error() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, AppError::DatabaseError(_)));
    }

    #[test]
    fn test_constraint_subject_names_the_constraint() {
        assert_eq!(
            constraint_subject(Some("products_name_key")),
            "products_name_key"
        );
        assert_eq!(constraint_subject(None), "unique key");
    }
}
