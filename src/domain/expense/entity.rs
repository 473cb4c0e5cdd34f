//! Expense entity

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// A single expense owned by a user, assigned to a category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    id: Uuid,
    amount: Decimal,
    description: String,
    date: DateTime<Utc>,
    notes: Option<String>,
    user_id: Uuid,
    category_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Expense {
    /// Create a new expense, enforcing amount > 0 and a non-empty description
    pub fn new(
        amount: Decimal,
        description: impl Into<String>,
        date: DateTime<Utc>,
        user_id: Uuid,
        category_id: Uuid,
        notes: Option<String>,
    ) -> Result<Self, DomainError> {
        let description = description.into();

        validate_amount(amount)?;
        validate_description(&description)?;

        let now = Utc::now();

        Ok(Self {
            id: Uuid::new_v4(),
            amount,
            description,
            date,
            notes,
            user_id,
            category_id,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstruct an expense from stored fields (repository restore)
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: Uuid,
        amount: Decimal,
        description: String,
        date: DateTime<Utc>,
        notes: Option<String>,
        user_id: Uuid,
        category_id: Uuid,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            amount,
            description,
            date,
            notes,
            user_id,
            category_id,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn category_id(&self) -> Uuid {
        self.category_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Update the mutable fields, re-checking the invariants
    pub fn update(
        &mut self,
        amount: Decimal,
        description: impl Into<String>,
        date: DateTime<Utc>,
        category_id: Uuid,
        notes: Option<String>,
    ) -> Result<(), DomainError> {
        let description = description.into();

        validate_amount(amount)?;
        validate_description(&description)?;

        self.amount = amount;
        self.description = description;
        self.date = date;
        self.category_id = category_id;
        self.notes = notes;
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

fn validate_description(description: &str) -> Result<(), DomainError> {
    if description.trim().is_empty() {
        return Err(DomainError::validation_field(
            "description",
            "Description is required",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn amount(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_expense() -> Expense {
        Expense::new(
            amount("42.50"),
            "Coffee",
            Utc::now(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_expense_creation() {
        let expense = create_test_expense();
        assert_eq!(expense.amount(), amount("42.50"));
        assert_eq!(expense.description(), "Coffee");
        assert!(expense.notes().is_none());
    }

    #[test]
    fn test_expense_rejects_zero_amount() {
        let result = Expense::new(
            Decimal::ZERO,
            "Coffee",
            Utc::now(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_expense_rejects_negative_amount() {
        let result = Expense::new(
            amount("-5"),
            "Coffee",
            Utc::now(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_expense_rejects_blank_description() {
        let result = Expense::new(
            amount("10"),
            "   ",
            Utc::now(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_expense_update() {
        let mut expense = create_test_expense();
        let new_category = Uuid::new_v4();
        let new_date = Utc::now();

        expense
            .update(
                amount("15.00"),
                "Lunch",
                new_date,
                new_category,
                Some("team lunch".to_string()),
            )
            .unwrap();

        assert_eq!(expense.amount(), amount("15.00"));
        assert_eq!(expense.description(), "Lunch");
        assert_eq!(expense.category_id(), new_category);
        assert_eq!(expense.notes(), Some("team lunch"));
    }

    #[test]
    fn test_expense_update_rejects_invalid_amount() {
        let mut expense = create_test_expense();
        let category_id = expense.category_id();
        let result = expense.update(Decimal::ZERO, "Lunch", Utc::now(), category_id, None);
        assert!(result.is_err());
        // Original values preserved
        assert_eq!(expense.amount(), amount("42.50"));
    }
}
