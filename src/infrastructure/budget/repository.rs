//! In-memory budget repository

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use crate::domain::budget::{Budget, BudgetRepository};
use crate::domain::DomainError;

/// In-memory implementation of BudgetRepository, keyed by user
#[derive(Debug, Default)]
pub struct InMemoryBudgetRepository {
    budgets: RwLock<HashMap<Uuid, Budget>>,
}

impl InMemoryBudgetRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BudgetRepository for InMemoryBudgetRepository {
    async fn get_by_user(&self, user_id: Uuid) -> Result<Option<Budget>, DomainError> {
        Ok(self.budgets.read().unwrap().get(&user_id).cloned())
    }

    async fn create(&self, budget: Budget) -> Result<Budget, DomainError> {
        let mut budgets = self.budgets.write().unwrap();

        if budgets.contains_key(&budget.user_id()) {
            return Err(DomainError::conflict(format!(
                "Budget for user '{}' already exists",
                budget.user_id()
            )));
        }

        budgets.insert(budget.user_id(), budget.clone());
        Ok(budget)
    }

    async fn update(&self, budget: &Budget) -> Result<(), DomainError> {
        let mut budgets = self.budgets.write().unwrap();

        if !budgets.contains_key(&budget.user_id()) {
            return Err(DomainError::not_found(format!(
                "Budget for user '{}' not found",
                budget.user_id()
            )));
        }

        budgets.insert(budget.user_id(), budget.clone());
        Ok(())
    }

    async fn delete_by_user(&self, user_id: Uuid) -> Result<bool, DomainError> {
        Ok(self.budgets.write().unwrap().remove(&user_id).is_some())
    }
}
