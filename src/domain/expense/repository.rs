//! Expense repository trait and query types

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::Expense;
use crate::domain::DomainError;

/// An expense joined with its category name, as read queries return it
#[derive(Debug, Clone)]
pub struct ExpenseRecord {
    pub expense: Expense,
    pub category_name: String,
}

/// Filter applied to expense list/summary queries; all conditions conjoin
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    pub category_id: Option<Uuid>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// Amount grouped by category name
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category_name: String,
    pub amount: Decimal,
    pub count: usize,
}

/// Summary over the full filtered set (not just a page)
#[derive(Debug, Clone)]
pub struct ExpenseSummary {
    pub total_amount: Decimal,
    pub total_count: usize,
    /// Amount-descending
    pub by_category: Vec<CategoryTotal>,
}

/// Repository for expense persistence
#[async_trait]
pub trait ExpenseRepository: Send + Sync {
    /// Get an expense owned by the user
    async fn get(&self, id: Uuid, user_id: Uuid) -> Result<Option<ExpenseRecord>, DomainError>;

    /// Persist a new expense
    async fn create(&self, expense: Expense) -> Result<Expense, DomainError>;

    /// Update an existing expense
    async fn update(&self, expense: &Expense) -> Result<(), DomainError>;

    /// Delete an expense owned by the user; returns false when absent
    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, DomainError>;

    /// List a page of the user's expenses, date-descending then
    /// created-at-descending. `page_number` is 1-based.
    async fn list_page(
        &self,
        user_id: Uuid,
        filter: &ExpenseFilter,
        page_number: u32,
        page_size: u32,
    ) -> Result<Vec<ExpenseRecord>, DomainError>;

    /// Summarize the full filtered set: total, count, per-category totals
    async fn summarize(
        &self,
        user_id: Uuid,
        filter: &ExpenseFilter,
    ) -> Result<ExpenseSummary, DomainError>;

    /// All of the user's expenses in the inclusive date range, optionally
    /// restricted to a category, date-descending. Used by the agent's
    /// query tool, which aggregates over the full result set.
    async fn query_range(
        &self,
        user_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        category_id: Option<Uuid>,
    ) -> Result<Vec<ExpenseRecord>, DomainError>;
}
