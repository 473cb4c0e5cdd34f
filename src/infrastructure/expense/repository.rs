//! In-memory expense repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use crate::domain::category::CategoryRepository;
use crate::domain::expense::{
    CategoryTotal, Expense, ExpenseFilter, ExpenseRecord, ExpenseRepository, ExpenseSummary,
};
use crate::domain::DomainError;
use std::sync::Arc;

/// In-memory implementation of ExpenseRepository. Resolves category names
/// through the category repository, as the SQL implementation does via JOIN.
pub struct InMemoryExpenseRepository {
    expenses: RwLock<HashMap<Uuid, Expense>>,
    categories: Arc<dyn CategoryRepository>,
}

impl InMemoryExpenseRepository {
    pub fn new(categories: Arc<dyn CategoryRepository>) -> Self {
        Self {
            expenses: RwLock::new(HashMap::new()),
            categories,
        }
    }

    fn matching(&self, user_id: Uuid, filter: &ExpenseFilter) -> Vec<Expense> {
        let mut matched: Vec<Expense> = self
            .expenses
            .read()
            .unwrap()
            .values()
            .filter(|e| e.user_id() == user_id)
            .filter(|e| filter.category_id.is_none_or(|c| e.category_id() == c))
            .filter(|e| filter.from.is_none_or(|from| e.date() >= from))
            .filter(|e| filter.to.is_none_or(|to| e.date() <= to))
            .cloned()
            .collect();

        matched.sort_by(|a, b| {
            b.date()
                .cmp(&a.date())
                .then_with(|| b.created_at().cmp(&a.created_at()))
        });

        matched
    }

    async fn with_category_names(
        &self,
        expenses: Vec<Expense>,
    ) -> Result<Vec<ExpenseRecord>, DomainError> {
        let mut records = Vec::with_capacity(expenses.len());

        for expense in expenses {
            let category_name = self
                .categories
                .get(expense.category_id())
                .await?
                .map(|c| c.name().to_string())
                .unwrap_or_default();

            records.push(ExpenseRecord {
                expense,
                category_name,
            });
        }

        Ok(records)
    }
}

#[async_trait]
impl ExpenseRepository for InMemoryExpenseRepository {
    async fn get(&self, id: Uuid, user_id: Uuid) -> Result<Option<ExpenseRecord>, DomainError> {
        let expense = self
            .expenses
            .read()
            .unwrap()
            .get(&id)
            .filter(|e| e.user_id() == user_id)
            .cloned();

        match expense {
            Some(e) => Ok(self.with_category_names(vec![e]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn create(&self, expense: Expense) -> Result<Expense, DomainError> {
        self.expenses
            .write()
            .unwrap()
            .insert(expense.id(), expense.clone());
        Ok(expense)
    }

    async fn update(&self, expense: &Expense) -> Result<(), DomainError> {
        let mut expenses = self.expenses.write().unwrap();

        if !expenses.contains_key(&expense.id()) {
            return Err(DomainError::not_found(format!(
                "Expense '{}' not found",
                expense.id()
            )));
        }

        expenses.insert(expense.id(), expense.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, DomainError> {
        let mut expenses = self.expenses.write().unwrap();

        match expenses.get(&id) {
            Some(e) if e.user_id() == user_id => {
                expenses.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list_page(
        &self,
        user_id: Uuid,
        filter: &ExpenseFilter,
        page_number: u32,
        page_size: u32,
    ) -> Result<Vec<ExpenseRecord>, DomainError> {
        let matched = self.matching(user_id, filter);

        let skip = (page_number.saturating_sub(1) as usize) * page_size as usize;
        let page: Vec<Expense> = matched
            .into_iter()
            .skip(skip)
            .take(page_size as usize)
            .collect();

        self.with_category_names(page).await
    }

    async fn summarize(
        &self,
        user_id: Uuid,
        filter: &ExpenseFilter,
    ) -> Result<ExpenseSummary, DomainError> {
        let matched = self.matching(user_id, filter);
        let records = self.with_category_names(matched).await?;

        Ok(summarize_records(&records))
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

        let matched = self.matching(user_id, &filter);
        self.with_category_names(matched).await
    }
}

/// Aggregate a filtered record set: total, count, per-category totals
/// (amount-descending). Shared with tests; mirrors the SQL GROUP BY.
pub fn summarize_records(records: &[ExpenseRecord]) -> ExpenseSummary {
    let total_amount: Decimal = records.iter().map(|r| r.expense.amount()).sum();

    let mut grouped: HashMap<String, (Decimal, usize)> = HashMap::new();

    for record in records {
        let entry = grouped
            .entry(record.category_name.clone())
            .or_insert((Decimal::ZERO, 0));
        entry.0 += record.expense.amount();
        entry.1 += 1;
    }

    let mut by_category: Vec<CategoryTotal> = grouped
        .into_iter()
        .map(|(category_name, (amount, count))| CategoryTotal {
            category_name,
            amount,
            count,
        })
        .collect();

    by_category.sort_by(|a, b| b.amount.cmp(&a.amount));

    ExpenseSummary {
        total_amount,
        total_count: records.len(),
        by_category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::Category;
    use crate::infrastructure::category::InMemoryCategoryRepository;
    use chrono::Duration;
    use std::str::FromStr;

    async fn setup() -> (Arc<InMemoryCategoryRepository>, InMemoryExpenseRepository, Uuid, Uuid) {
        let categories = Arc::new(InMemoryCategoryRepository::new());
        let food = categories
            .create(Category::new("Food", None, None, None, None).unwrap())
            .await
            .unwrap();
        let transport = categories
            .create(Category::new("Transport", None, None, None, None).unwrap())
            .await
            .unwrap();

        let repo = InMemoryExpenseRepository::new(categories.clone());
        (categories, repo, food.id(), transport.id())
    }

    fn amount(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[tokio::test]
    async fn test_get_scoped_to_owner() {
        let (_, repo, food, _) = setup().await;
        let owner = Uuid::new_v4();

        let expense = repo
            .create(Expense::new(amount("10"), "Lunch", Utc::now(), owner, food, None).unwrap())
            .await
            .unwrap();

        assert!(repo.get(expense.id(), owner).await.unwrap().is_some());
        assert!(repo.get(expense.id(), Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_page_orders_date_descending() {
        let (_, repo, food, _) = setup().await;
        let owner = Uuid::new_v4();
        let now = Utc::now();

        for (days_ago, desc) in [(2, "oldest"), (0, "newest"), (1, "middle")] {
            repo.create(
                Expense::new(
                    amount("10"),
                    desc,
                    now - Duration::days(days_ago),
                    owner,
                    food,
                    None,
                )
                .unwrap(),
            )
            .await
            .unwrap();
        }

        let page = repo
            .list_page(owner, &ExpenseFilter::default(), 1, 10)
            .await
            .unwrap();

        let descriptions: Vec<&str> =
            page.iter().map(|r| r.expense.description()).collect();
        assert_eq!(descriptions, vec!["newest", "middle", "oldest"]);
    }

    #[tokio::test]
    async fn test_summary_totals_match() {
        let (_, repo, food, transport) = setup().await;
        let owner = Uuid::new_v4();
        let now = Utc::now();

        for (amt, category) in [("10.50", food), ("4.50", food), ("20.00", transport)] {
            repo.create(
                Expense::new(amount(amt), "x", now, owner, category, None).unwrap(),
            )
            .await
            .unwrap();
        }

        let summary = repo
            .summarize(owner, &ExpenseFilter::default())
            .await
            .unwrap();

        assert_eq!(summary.total_amount, amount("35.00"));
        assert_eq!(summary.total_count, 3);

        let by_category_sum: Decimal = summary.by_category.iter().map(|c| c.amount).sum();
        assert_eq!(by_category_sum, summary.total_amount);

        // Amount-descending
        assert_eq!(summary.by_category[0].category_name, "Transport");
        assert_eq!(summary.by_category[0].amount, amount("20.00"));
    }

    #[tokio::test]
    async fn test_query_range_is_inclusive() {
        let (_, repo, food, _) = setup().await;
        let owner = Uuid::new_v4();
        let now = Utc::now();

        repo.create(Expense::new(amount("1"), "inside", now, owner, food, None).unwrap())
            .await
            .unwrap();
        repo.create(
            Expense::new(
                amount("2"),
                "outside",
                now - Duration::days(10),
                owner,
                food,
                None,
            )
            .unwrap(),
        )
        .await
        .unwrap();

        let records = repo
            .query_range(owner, now - Duration::days(7), now, None)
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].expense.description(), "inside");
        assert_eq!(records[0].category_name, "Food");
    }
}
