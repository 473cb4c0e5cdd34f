//! PostgreSQL budget repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::budget::{Budget, BudgetRepository};
use crate::domain::DomainError;

/// PostgreSQL implementation of BudgetRepository. The table carries a
/// unique constraint on user_id.
#[derive(Debug, Clone)]
pub struct PostgresBudgetRepository {
    pool: PgPool,
}

impl PostgresBudgetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BudgetRepository for PostgresBudgetRepository {
    async fn get_by_user(&self, user_id: Uuid) -> Result<Option<Budget>, DomainError> {
        let row = sqlx::query(
            "SELECT id, user_id, amount, created_at, updated_at FROM budgets WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get budget: {}", e)))?;

        Ok(row.map(|r| {
            Budget::from_parts(
                r.get("id"),
                r.get("user_id"),
                r.get("amount"),
                r.get("created_at"),
                r.get("updated_at"),
            )
        }))
    }

    async fn create(&self, budget: Budget) -> Result<Budget, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO budgets (id, user_id, amount, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(budget.id())
        .bind(budget.user_id())
        .bind(budget.amount())
        .bind(budget.created_at())
        .bind(budget.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();

            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                DomainError::conflict(format!(
                    "Budget for user '{}' already exists",
                    budget.user_id()
                ))
            } else {
                DomainError::storage(format!("Failed to create budget: {}", e))
            }
        })?;

        Ok(budget)
    }

    async fn update(&self, budget: &Budget) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE budgets SET amount = $2, updated_at = $3 WHERE user_id = $1",
        )
        .bind(budget.user_id())
        .bind(budget.amount())
        .bind(budget.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to update budget: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Budget for user '{}' not found",
                budget.user_id()
            )));
        }

        Ok(())
    }

    async fn delete_by_user(&self, user_id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM budgets WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete budget: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}
