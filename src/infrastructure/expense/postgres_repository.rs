//! PostgreSQL expense repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use uuid::Uuid;

use crate::domain::expense::{
    CategoryTotal, Expense, ExpenseFilter, ExpenseRecord, ExpenseRepository, ExpenseSummary,
};
use crate::domain::DomainError;

/// PostgreSQL implementation of ExpenseRepository
#[derive(Debug, Clone)]
pub struct PostgresExpenseRepository {
    pool: PgPool,
}

impl PostgresExpenseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn select_records<'a>(
        user_id: Uuid,
        filter: &'a ExpenseFilter,
    ) -> QueryBuilder<'a, Postgres> {
        let mut builder = QueryBuilder::new(
            r#"
            SELECT e.id, e.amount, e.description, e.date, e.notes, e.user_id,
                   e.category_id, e.created_at, e.updated_at, c.name AS category_name
            FROM expenses e
            JOIN categories c ON c.id = e.category_id
            WHERE e.user_id = "#,
        );
        builder.push_bind(user_id);

        if let Some(category_id) = filter.category_id {
            builder.push(" AND e.category_id = ");
            builder.push_bind(category_id);
        }

        if let Some(from) = filter.from {
            builder.push(" AND e.date >= ");
            builder.push_bind(from);
        }

        if let Some(to) = filter.to {
            builder.push(" AND e.date <= ");
            builder.push_bind(to);
        }

        builder
    }
}

#[async_trait]
impl ExpenseRepository for PostgresExpenseRepository {
    async fn get(&self, id: Uuid, user_id: Uuid) -> Result<Option<ExpenseRecord>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT e.id, e.amount, e.description, e.date, e.notes, e.user_id,
                   e.category_id, e.created_at, e.updated_at, c.name AS category_name
            FROM expenses e
            JOIN categories c ON c.id = e.category_id
            WHERE e.id = $1 AND e.user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get expense: {}", e)))?;

        Ok(row.map(|r| row_to_record(&r)))
    }

    async fn create(&self, expense: Expense) -> Result<Expense, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO expenses (id, amount, description, date, notes, user_id,
                                  category_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(expense.id())
        .bind(expense.amount())
        .bind(expense.description())
        .bind(expense.date())
        .bind(expense.notes())
        .bind(expense.user_id())
        .bind(expense.category_id())
        .bind(expense.created_at())
        .bind(expense.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create expense: {}", e)))?;

        Ok(expense)
    }

    async fn update(&self, expense: &Expense) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE expenses
            SET amount = $2, description = $3, date = $4, notes = $5,
                category_id = $6, updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(expense.id())
        .bind(expense.amount())
        .bind(expense.description())
        .bind(expense.date())
        .bind(expense.notes())
        .bind(expense.category_id())
        .bind(expense.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to update expense: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Expense '{}' not found",
                expense.id()
            )));
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete expense: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_page(
        &self,
        user_id: Uuid,
        filter: &ExpenseFilter,
        page_number: u32,
        page_size: u32,
    ) -> Result<Vec<ExpenseRecord>, DomainError> {
        let offset = i64::from(page_number.saturating_sub(1)) * i64::from(page_size);

        let mut builder = Self::select_records(user_id, filter);
        builder.push(" ORDER BY e.date DESC, e.created_at DESC LIMIT ");
        builder.push_bind(i64::from(page_size));
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list expenses: {}", e)))?;

        Ok(rows.iter().map(row_to_record).collect())
    }

    async fn summarize(
        &self,
        user_id: Uuid,
        filter: &ExpenseFilter,
    ) -> Result<ExpenseSummary, DomainError> {
        let mut builder = QueryBuilder::<Postgres>::new(
            r#"
            SELECT c.name AS category_name, SUM(e.amount) AS amount, COUNT(*) AS count
            FROM expenses e
            JOIN categories c ON c.id = e.category_id
            WHERE e.user_id = "#,
        );
        builder.push_bind(user_id);

        if let Some(category_id) = filter.category_id {
            builder.push(" AND e.category_id = ");
            builder.push_bind(category_id);
        }

        if let Some(from) = filter.from {
            builder.push(" AND e.date >= ");
            builder.push_bind(from);
        }

        if let Some(to) = filter.to {
            builder.push(" AND e.date <= ");
            builder.push_bind(to);
        }

        builder.push(" GROUP BY c.name ORDER BY amount DESC");

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to summarize expenses: {}", e)))?;

        let mut total_amount = Decimal::ZERO;
        let mut total_count = 0usize;
        let mut by_category = Vec::with_capacity(rows.len());

        for row in rows {
            let amount: Decimal = row.get("amount");
            let count: i64 = row.get("count");

            total_amount += amount;
            total_count += count as usize;

            by_category.push(CategoryTotal {
                category_name: row.get("category_name"),
                amount,
                count: count as usize,
            });
        }

        Ok(ExpenseSummary {
            total_amount,
            total_count,
            by_category,
        })
    }

    async fn query_range(
        &self,
        user_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        category_id: Option<Uuid>,
    ) -> Result<Vec<ExpenseRecord>, DomainError> {
        let filter = ExpenseFilter {
            category_id,
            from: Some(from),
            to: Some(to),
        };

        let mut builder = Self::select_records(user_id, &filter);
        builder.push(" ORDER BY e.date DESC, e.created_at DESC");

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to query expenses: {}", e)))?;

        Ok(rows.iter().map(row_to_record).collect())
    }
}

fn row_to_record(row: &sqlx::postgres::PgRow) -> ExpenseRecord {
    let expense = Expense::from_parts(
        row.get("id"),
        row.get("amount"),
        row.get("description"),
        row.get("date"),
        row.get("notes"),
        row.get("user_id"),
        row.get("category_id"),
        row.get("created_at"),
        row.get("updated_at"),
    );

    ExpenseRecord {
        expense,
        category_name: row.get("category_name"),
    }
}
