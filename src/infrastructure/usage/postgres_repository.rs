//! PostgreSQL usage log repository implementation

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::usage::{AiUsageLog, UsageLogRepository};
use crate::domain::DomainError;

/// PostgreSQL implementation of UsageLogRepository. The table carries a
/// unique constraint on (user_id, date); a violation surfaces as Conflict
/// so the service can fall back to an increment.
#[derive(Debug, Clone)]
pub struct PostgresUsageLogRepository {
    pool: PgPool,
}

impl PostgresUsageLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UsageLogRepository for PostgresUsageLogRepository {
    async fn find_for_day(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<AiUsageLog>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, date, message_count, created_at, updated_at
            FROM ai_usage_logs
            WHERE user_id = $1 AND date = $2
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get usage log: {}", e)))?;

        Ok(row.map(|r| {
            let count: i32 = r.get("message_count");

            AiUsageLog::from_parts(
                r.get("id"),
                r.get("user_id"),
                r.get("date"),
                count as u32,
                r.get("created_at"),
                r.get("updated_at"),
            )
        }))
    }

    async fn create(&self, log: AiUsageLog) -> Result<AiUsageLog, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO ai_usage_logs (id, user_id, date, message_count, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(log.id())
        .bind(log.user_id())
        .bind(log.date())
        .bind(log.message_count() as i32)
        .bind(log.created_at())
        .bind(log.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();

            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                DomainError::conflict(format!(
                    "Usage log for user '{}' on {} already exists",
                    log.user_id(),
                    log.date()
                ))
            } else {
                DomainError::storage(format!("Failed to create usage log: {}", e))
            }
        })?;

        Ok(log)
    }

    async fn increment(&self, user_id: Uuid, date: NaiveDate) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE ai_usage_logs
            SET message_count = message_count + 1, updated_at = NOW()
            WHERE user_id = $1 AND date = $2
            "#,
        )
        .bind(user_id)
        .bind(date)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to increment usage log: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Usage log for user '{}' on {} not found",
                user_id, date
            )));
        }

        Ok(())
    }
}
