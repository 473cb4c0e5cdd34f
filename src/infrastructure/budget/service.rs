//! Budget service - get, set-or-replace, delete

use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::budget::{Budget, BudgetRepository};
use crate::domain::DomainError;

/// Budget service
pub struct BudgetService {
    repository: Arc<dyn BudgetRepository>,
}

impl BudgetService {
    pub fn new(repository: Arc<dyn BudgetRepository>) -> Self {
        Self { repository }
    }

    /// The user's budget, if one is set
    pub async fn get(&self, user_id: Uuid) -> Result<Option<Budget>, DomainError> {
        self.repository.get_by_user(user_id).await
    }

    /// Set the budget, replacing any existing amount
    pub async fn set(&self, user_id: Uuid, amount: Decimal) -> Result<(), DomainError> {
        match self.repository.get_by_user(user_id).await? {
            Some(mut budget) => {
                budget.update(amount)?;
                self.repository.update(&budget).await
            }
            None => {
                let budget = Budget::new(user_id, amount)?;
                self.repository.create(budget).await.map(|_| ())
            }
        }
    }

    /// Delete the budget; NotFound when none is set
    pub async fn delete(&self, user_id: Uuid) -> Result<(), DomainError> {
        if !self.repository.delete_by_user(user_id).await? {
            return Err(DomainError::not_found(format!(
                "Budget for user '{}' not found",
                user_id
            )));
        }
        Ok(())
    }
}
