//! Product category service

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::validation::validate_name;

/// Category registry over the `categories` table
#[derive(Clone)]
pub struct CategoryService {
    db: PgPool,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryInput {
    pub name: String,
}

impl CategoryService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn create_category(&self, input: CreateCategoryInput) -> AppResult<Category> {
        validate_name(&input.name).map_err(|m| AppError::validation("name", m))?;

        let name_taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE name = $1)",
        )
        .bind(input.name.trim())
        .fetch_one(&self.db)
        .await?;

        if name_taken {
            return Err(AppError::DuplicateKey("category name".to_string()));
        }

        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name) VALUES ($1) RETURNING id, name",
        )
        .bind(input.name.trim())
        .fetch_one(&self.db)
        .await?;

        tracing::info!(category_id = %category.id, name = %category.name, "category created");
        Ok(category)
    }

    pub async fn get_category(&self, id: Uuid) -> AppResult<Category> {
        sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Category".to_string()))
    }

    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY name")
                .fetch_all(&self.db)
                .await?;

        Ok(categories)
    }

    pub async fn rename_category(&self, id: Uuid, new_name: &str) -> AppResult<Category> {
        validate_name(new_name).map_err(|m| AppError::validation("name", m))?;

        let name_taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE name = $1 AND id <> $2)",
        )
        .bind(new_name.trim())
        .bind(id)
        .fetch_one(&self.db)
        .await?;

        if name_taken {
            return Err(AppError::DuplicateKey("category name".to_string()));
        }

        sqlx::query_as::<_, Category>(
            "UPDATE categories SET name = $2 WHERE id = $1 RETURNING id, name",
        )
        .bind(id)
        .bind(new_name.trim())
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Category".to_string()))
    }
}
