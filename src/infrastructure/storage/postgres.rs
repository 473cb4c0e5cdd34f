//! PostgreSQL connection and embedded migrations

use sqlx::postgres::PgPool;
use tracing::info;

use crate::domain::DomainError;

/// Connect to PostgreSQL
pub async fn connect(database_url: &str) -> Result<PgPool, DomainError> {
    PgPool::connect(database_url)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))
}

/// A single schema migration
pub struct Migration {
    pub version: i64,
    pub description: &'static str,
    pub up: &'static str,
}

/// PostgreSQL migrator running the embedded migration list
#[derive(Debug)]
pub struct PostgresMigrator {
    pool: PgPool,
}

impl PostgresMigrator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run all pending migrations
    pub async fn run(&self) -> Result<(), DomainError> {
        self.ensure_migrations_table().await?;

        for migration in migrations() {
            self.run_migration(&migration).await?;
        }

        Ok(())
    }

    async fn ensure_migrations_table(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version BIGINT PRIMARY KEY,
                description TEXT NOT NULL,
                installed_on TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create migrations table: {}", e)))?;

        Ok(())
    }

    async fn run_migration(&self, migration: &Migration) -> Result<(), DomainError> {
        let applied: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _migrations WHERE version = $1)")
                .bind(migration.version)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::storage(format!("Failed to check migration status: {}", e))
                })?;

        if applied {
            return Ok(());
        }

        sqlx::raw_sql(migration.up)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to run migration {}: {}",
                    migration.version, e
                ))
            })?;

        sqlx::query("INSERT INTO _migrations (version, description) VALUES ($1, $2)")
            .bind(migration.version)
            .bind(migration.description)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to record migration: {}", e)))?;

        info!(
            version = migration.version,
            description = migration.description,
            "Applied migration"
        );

        Ok(())
    }
}

fn migrations() -> Vec<Migration> {
    vec![Migration {
        version: 1,
        description: "initial schema",
        up: r#"
            CREATE TABLE users (
                id UUID PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'user',
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            );

            CREATE TABLE categories (
                id UUID PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT,
                icon TEXT,
                color TEXT,
                user_id UUID REFERENCES users(id) ON DELETE CASCADE,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            );

            CREATE INDEX idx_categories_user_id ON categories(user_id);

            CREATE TABLE expenses (
                id UUID PRIMARY KEY,
                amount NUMERIC(18, 2) NOT NULL CHECK (amount > 0),
                description TEXT NOT NULL,
                date TIMESTAMPTZ NOT NULL,
                notes TEXT,
                user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                category_id UUID NOT NULL REFERENCES categories(id),
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            );

            CREATE INDEX idx_expenses_user_date ON expenses(user_id, date DESC);
            CREATE INDEX idx_expenses_category ON expenses(category_id);

            CREATE TABLE budgets (
                id UUID PRIMARY KEY,
                user_id UUID NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
                amount NUMERIC(18, 2) NOT NULL CHECK (amount > 0),
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            );

            CREATE TABLE ai_usage_logs (
                id UUID PRIMARY KEY,
                user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                date DATE NOT NULL,
                message_count INTEGER NOT NULL DEFAULT 1,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL,
                UNIQUE (user_id, date)
            );
        "#,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_ordered_and_unique() {
        let migrations = migrations();

        let mut versions: Vec<i64> = migrations.iter().map(|m| m.version).collect();
        let original = versions.clone();

        versions.sort_unstable();
        versions.dedup();

        assert_eq!(versions, original);
        assert!(!migrations.is_empty());
    }
}
