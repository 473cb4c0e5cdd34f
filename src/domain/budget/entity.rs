//! Budget entity

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// Monthly budget amount; at most one per user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    id: Uuid,
    user_id: Uuid,
    amount: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Budget {
    /// Create a new budget, enforcing amount > 0
    pub fn new(user_id: Uuid, amount: Decimal) -> Result<Self, DomainError> {
        validate_amount(amount)?;

        let now = Utc::now();

        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            amount,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstruct a budget from stored fields (repository restore)
    pub fn from_parts(
        id: Uuid,
        user_id: Uuid,
        amount: Decimal,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            amount,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replace the amount, re-checking the invariant
    pub fn update(&mut self, amount: Decimal) -> Result<(), DomainError> {
        validate_amount(amount)?;
        self.amount = amount;
        self.updated_at = Utc::now();
        Ok(())
    }
}

fn validate_amount(amount: Decimal) -> Result<(), DomainError> {
    if amount <= Decimal::ZERO {
        return Err(DomainError::validation_field(
            "amount",
            "Amount must be greater than zero",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_budget_creation() {
        let user_id = Uuid::new_v4();
        let budget = Budget::new(user_id, Decimal::from_str("1500").unwrap()).unwrap();

        assert_eq!(budget.user_id(), user_id);
        assert_eq!(budget.amount(), Decimal::from_str("1500").unwrap());
    }

    #[test]
    fn test_budget_rejects_non_positive_amount() {
        assert!(Budget::new(Uuid::new_v4(), Decimal::ZERO).is_err());
        assert!(Budget::new(Uuid::new_v4(), Decimal::from_str("-1").unwrap()).is_err());
    }

    #[test]
    fn test_budget_update() {
        let mut budget = Budget::new(Uuid::new_v4(), Decimal::from_str("1000").unwrap()).unwrap();

        budget.update(Decimal::from_str("2000").unwrap()).unwrap();
        assert_eq!(budget.amount(), Decimal::from_str("2000").unwrap());

        assert!(budget.update(Decimal::ZERO).is_err());
        assert_eq!(budget.amount(), Decimal::from_str("2000").unwrap());
    }
}
