//! Warehouse registry service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::validation::validate_name;

/// Warehouse registry over the `warehouses` table
#[derive(Clone)]
pub struct WarehouseService {
    db: PgPool,
}

/// A physical storage location
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Warehouse {
    pub id: Uuid,
    pub address: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Input for registering a warehouse
#[derive(Debug, Deserialize)]
pub struct CreateWarehouseInput {
    pub address: String,
    pub name: String,
}

const WAREHOUSE_COLUMNS: &str = "id, address, name, created_at";

impl WarehouseService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Register a warehouse; both the name and the address must be unique
    pub async fn create_warehouse(&self, input: CreateWarehouseInput) -> AppResult<Warehouse> {
        validate_name(&input.name).map_err(|m| AppError::validation("name", m))?;
        validate_name(&input.address).map_err(|m| AppError::validation("address", m))?;

        let name_taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM warehouses WHERE name = $1)",
        )
        .bind(input.name.trim())
        .fetch_one(&self.db)
        .await?;

        if name_taken {
            return Err(AppError::DuplicateKey("warehouse name".to_string()));
        }

        let address_taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM warehouses WHERE address = $1)",
        )
        .bind(input.address.trim())
        .fetch_one(&self.db)
        .await?;

        if address_taken {
            return Err(AppError::DuplicateKey("warehouse address".to_string()));
        }

        let warehouse = sqlx::query_as::<_, Warehouse>(&format!(
            r#"
            INSERT INTO warehouses (address, name)
            VALUES ($1, $2)
            RETURNING {WAREHOUSE_COLUMNS}
            "#
        ))
        .bind(input.address.trim())
        .bind(input.name.trim())
        .fetch_one(&self.db)
        .await?;

        tracing::info!(warehouse_id = %warehouse.id, name = %warehouse.name, "warehouse created");
        Ok(warehouse)
    }

    pub async fn get_warehouse(&self, id: Uuid) -> AppResult<Warehouse> {
        sqlx::query_as::<_, Warehouse>(&format!(
            "SELECT {WAREHOUSE_COLUMNS} FROM warehouses WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Warehouse".to_string()))
    }

    pub async fn list_warehouses(&self) -> AppResult<Vec<Warehouse>> {
        let warehouses = sqlx::query_as::<_, Warehouse>(&format!(
            "SELECT {WAREHOUSE_COLUMNS} FROM warehouses ORDER BY name"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(warehouses)
    }

    pub async fn rename_warehouse(&self, id: Uuid, new_name: &str) -> AppResult<Warehouse> {
        validate_name(new_name).map_err(|m| AppError::validation("name", m))?;

        let name_taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM warehouses WHERE name = $1 AND id <> $2)",
        )
        .bind(new_name.trim())
        .bind(id)
        .fetch_one(&self.db)
        .await?;

        if name_taken {
            return Err(AppError::DuplicateKey("warehouse name".to_string()));
        }

        sqlx::query_as::<_, Warehouse>(&format!(
            r#"
            UPDATE warehouses
            SET name = $2
            WHERE id = $1
            RETURNING {WAREHOUSE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(new_name.trim())
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Warehouse".to_string()))
    }

    pub async fn change_address(&self, id: Uuid, new_address: &str) -> AppResult<Warehouse> {
        validate_name(new_address).map_err(|m| AppError::validation("address", m))?;

        let address_taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM warehouses WHERE address = $1 AND id <> $2)",
        )
        .bind(new_address.trim())
        .bind(id)
        .fetch_one(&self.db)
        .await?;

        if address_taken {
            return Err(AppError::DuplicateKey("warehouse address".to_string()));
        }

        sqlx::query_as::<_, Warehouse>(&format!(
            r#"
            UPDATE warehouses
            SET address = $2
            WHERE id = $1
            RETURNING {WAREHOUSE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(new_address.trim())
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Warehouse".to_string()))
    }
}
