//! Expense service - CRUD plus paged listing with a full-set summary

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::category::CategoryRepository;
use crate::domain::expense::{
    CategoryTotal, Expense, ExpenseFilter, ExpenseRecord, ExpenseRepository,
};
use crate::domain::DomainError;

const MAX_DESCRIPTION_LENGTH: usize = 200;
const MAX_NOTES_LENGTH: usize = 500;

/// Request for creating or replacing an expense
#[derive(Debug, Clone)]
pub struct ExpenseInput {
    pub amount: Decimal,
    pub description: String,
    pub date: DateTime<Utc>,
    pub category_id: Uuid,
    pub notes: Option<String>,
}

/// One page of expenses plus the summary over the whole filtered set
#[derive(Debug)]
pub struct ExpensePage {
    pub items: Vec<ExpenseRecord>,
    pub total_count: usize,
    pub page_number: u32,
    pub page_size: u32,
    pub total_amount: Decimal,
    pub by_category: Vec<CategoryTotal>,
}

impl ExpensePage {
    pub fn total_pages(&self) -> u32 {
        if self.total_count == 0 {
            0
        } else {
            (self.total_count as u32).div_ceil(self.page_size)
        }
    }

    pub fn has_previous_page(&self) -> bool {
        self.page_number > 1
    }

    pub fn has_next_page(&self) -> bool {
        self.page_number < self.total_pages()
    }
}

/// Expense service
pub struct ExpenseService {
    expenses: Arc<dyn ExpenseRepository>,
    categories: Arc<dyn CategoryRepository>,
}

impl ExpenseService {
    pub fn new(
        expenses: Arc<dyn ExpenseRepository>,
        categories: Arc<dyn CategoryRepository>,
    ) -> Self {
        Self {
            expenses,
            categories,
        }
    }

    /// Create a new expense for the user. The category must be a system
    /// category or one of the user's own.
    pub async fn create(&self, user_id: Uuid, input: ExpenseInput) -> Result<Uuid, DomainError> {
        validate_input(&input)?;
        self.ensure_category_visible(input.category_id, user_id).await?;

        let expense = Expense::new(
            input.amount,
            input.description,
            input.date,
            user_id,
            input.category_id,
            input.notes,
        )?;

        let expense = self.expenses.create(expense).await?;
        Ok(expense.id())
    }

    /// Get one of the user's expenses
    pub async fn get(&self, id: Uuid, user_id: Uuid) -> Result<ExpenseRecord, DomainError> {
        self.expenses
            .get(id, user_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Expense '{}' not found", id)))
    }

    /// Update one of the user's expenses
    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        input: ExpenseInput,
    ) -> Result<(), DomainError> {
        validate_input(&input)?;

        let mut record = self.get(id, user_id).await?;
        self.ensure_category_visible(input.category_id, user_id).await?;

        record.expense.update(
            input.amount,
            input.description,
            input.date,
            input.category_id,
            input.notes,
        )?;

        self.expenses.update(&record.expense).await
    }

    /// Delete one of the user's expenses
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<(), DomainError> {
        if !self.expenses.delete(id, user_id).await? {
            return Err(DomainError::not_found(format!(
                "Expense '{}' not found",
                id
            )));
        }
        Ok(())
    }

    /// One page of expenses plus a summary computed over the full filtered
    /// set, not just the page.
    pub async fn list(
        &self,
        user_id: Uuid,
        filter: ExpenseFilter,
        page_number: u32,
        page_size: u32,
    ) -> Result<ExpensePage, DomainError> {
        let page_number = page_number.max(1);
        let page_size = page_size.clamp(1, 100);

        let items = self
            .expenses
            .list_page(user_id, &filter, page_number, page_size)
            .await?;
        let summary = self.expenses.summarize(user_id, &filter).await?;

        Ok(ExpensePage {
            items,
            total_count: summary.total_count,
            page_number,
            page_size,
            total_amount: summary.total_amount,
            by_category: summary.by_category,
        })
    }

    async fn ensure_category_visible(
        &self,
        category_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), DomainError> {
        if !self.categories.visible_exists(category_id, user_id).await? {
            return Err(DomainError::not_found(format!(
                "Category '{}' not found",
                category_id
            )));
        }
        Ok(())
    }
}

fn validate_input(input: &ExpenseInput) -> Result<(), DomainError> {
    if input.amount <= Decimal::ZERO {
        return Err(DomainError::validation_field(
            "amount",
            "Amount must be greater than zero",
        ));
    }

    if input.description.trim().is_empty() {
        return Err(DomainError::validation_field(
            "description",
            "Description is required",
        ));
    }

    if input.description.len() > MAX_DESCRIPTION_LENGTH {
        return Err(DomainError::validation_field(
            "description",
            format!("Description must not exceed {MAX_DESCRIPTION_LENGTH} characters"),
        ));
    }

    if input.date.date_naive() > Utc::now().date_naive() {
        return Err(DomainError::validation_field(
            "date",
            "Date cannot be in the future",
        ));
    }

    if let Some(notes) = &input.notes {
        if notes.len() > MAX_NOTES_LENGTH {
            return Err(DomainError::validation_field(
                "notes",
                format!("Notes must not exceed {MAX_NOTES_LENGTH} characters"),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::Category;
    use crate::infrastructure::category::InMemoryCategoryRepository;
    use crate::infrastructure::expense::repository::InMemoryExpenseRepository;
    use std::str::FromStr;

    struct Fixture {
        service: ExpenseService,
        user_id: Uuid,
        food: Uuid,
    }

    async fn setup() -> Fixture {
        let categories = Arc::new(InMemoryCategoryRepository::new());
        let food = categories
            .create(Category::new("Food", None, None, None, None).unwrap())
            .await
            .unwrap();

        let expenses = Arc::new(InMemoryExpenseRepository::new(categories.clone()));
        let service = ExpenseService::new(expenses, categories);

        Fixture {
            service,
            user_id: Uuid::new_v4(),
            food: food.id(),
        }
    }

    fn amount(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn input(amt: &str, category_id: Uuid) -> ExpenseInput {
        ExpenseInput {
            amount: amount(amt),
            description: "Lunch".to_string(),
            date: Utc::now(),
            category_id,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_round_trip() {
        let f = setup().await;

        let id = f.service.create(f.user_id, input("12.30", f.food)).await.unwrap();
        let record = f.service.get(id, f.user_id).await.unwrap();

        assert_eq!(record.expense.amount(), amount("12.30"));
        assert_eq!(record.category_name, "Food");
    }

    #[tokio::test]
    async fn test_create_rejects_non_positive_amount() {
        let f = setup().await;

        let result = f.service.create(f.user_id, input("0", f.food)).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));

        let result = f.service.create(f.user_id, input("-3.50", f.food)).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));

        // Nothing persisted
        let page = f
            .service
            .list(f.user_id, ExpenseFilter::default(), 1, 10)
            .await
            .unwrap();
        assert_eq!(page.total_count, 0);
    }

    #[tokio::test]
    async fn test_create_rejects_invisible_category() {
        let f = setup().await;

        let result = f.service.create(f.user_id, input("10", Uuid::new_v4())).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));

        let page = f
            .service
            .list(f.user_id, ExpenseFilter::default(), 1, 10)
            .await
            .unwrap();
        assert_eq!(page.total_count, 0);
    }

    #[tokio::test]
    async fn test_create_rejects_future_date() {
        let f = setup().await;

        let mut future = input("10", f.food);
        future.date = Utc::now() + chrono::Duration::days(2);

        let result = f.service.create(f.user_id, future).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_update_missing_expense() {
        let f = setup().await;

        let result = f
            .service
            .update(Uuid::new_v4(), f.user_id, input("10", f.food))
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete() {
        let f = setup().await;

        let id = f.service.create(f.user_id, input("10", f.food)).await.unwrap();
        f.service.delete(id, f.user_id).await.unwrap();

        let result = f.service.delete(id, f.user_id).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_page_math() {
        let f = setup().await;

        for _ in 0..25 {
            f.service.create(f.user_id, input("1", f.food)).await.unwrap();
        }

        let page = f
            .service
            .list(f.user_id, ExpenseFilter::default(), 2, 10)
            .await
            .unwrap();

        assert_eq!(page.items.len(), 10);
        assert_eq!(page.total_count, 25);
        assert_eq!(page.total_pages(), 3);
        assert!(page.has_previous_page());
        assert!(page.has_next_page());
        assert_eq!(page.total_amount, amount("25"));
    }
}
