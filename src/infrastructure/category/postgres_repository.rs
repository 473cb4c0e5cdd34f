//! PostgreSQL category repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::category::{Category, CategoryRepository};
use crate::domain::DomainError;

/// PostgreSQL implementation of CategoryRepository
#[derive(Debug, Clone)]
pub struct PostgresCategoryRepository {
    pool: PgPool,
}

impl PostgresCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const CATEGORY_COLUMNS: &str =
    "id, name, description, icon, color, user_id, created_at, updated_at";

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn get(&self, id: Uuid) -> Result<Option<Category>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get category: {}", e)))?;

        Ok(row.map(|r| row_to_category(&r)))
    }

    async fn list_visible(&self, user_id: Uuid) -> Result<Vec<Category>, DomainError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {CATEGORY_COLUMNS} FROM categories
            WHERE user_id IS NULL OR user_id = $1
            ORDER BY (user_id IS NULL) DESC, name
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list categories: {}", e)))?;

        Ok(rows.iter().map(row_to_category).collect())
    }

    async fn visible_exists(&self, id: Uuid, user_id: Uuid) -> Result<bool, DomainError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM categories
                WHERE id = $1 AND (user_id IS NULL OR user_id = $2)
            )
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to check category: {}", e)))?;

        Ok(exists)
    }

    async fn create(&self, category: Category) -> Result<Category, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO categories (id, name, description, icon, color, user_id,
                                    created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(category.id())
        .bind(category.name())
        .bind(category.description())
        .bind(category.icon())
        .bind(category.color())
        .bind(category.user_id())
        .bind(category.created_at())
        .bind(category.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create category: {}", e)))?;

        Ok(category)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count categories: {}", e)))?;

        Ok(count as usize)
    }
}

fn row_to_category(row: &sqlx::postgres::PgRow) -> Category {
    Category::from_parts(
        row.get("id"),
        row.get("name"),
        row.get("description"),
        row.get("icon"),
        row.get("color"),
        row.get("user_id"),
        row.get("created_at"),
        row.get("updated_at"),
    )
}
