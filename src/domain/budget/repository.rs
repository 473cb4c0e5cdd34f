//! Budget repository trait

use async_trait::async_trait;
use uuid::Uuid;

use super::Budget;
use crate::domain::DomainError;

/// Repository for budget persistence (one row per user)
#[async_trait]
pub trait BudgetRepository: Send + Sync {
    /// Get the user's budget, if set
    async fn get_by_user(&self, user_id: Uuid) -> Result<Option<Budget>, DomainError>;

    /// Persist a new budget
    async fn create(&self, budget: Budget) -> Result<Budget, DomainError>;

    /// Update an existing budget
    async fn update(&self, budget: &Budget) -> Result<(), DomainError>;

    /// Delete the user's budget; returns false when absent
    async fn delete_by_user(&self, user_id: Uuid) -> Result<bool, DomainError>;
}
