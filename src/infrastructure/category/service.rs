//! Category service - visible listing and startup seeding

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::category::{Category, CategoryRepository};
use crate::domain::DomainError;

/// Category service
pub struct CategoryService {
    repository: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(repository: Arc<dyn CategoryRepository>) -> Self {
        Self { repository }
    }

    /// Categories visible to a user: system defaults plus the user's own
    pub async fn list_visible(&self, user_id: Uuid) -> Result<Vec<Category>, DomainError> {
        self.repository.list_visible(user_id).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Category>, DomainError> {
        self.repository.get(id).await
    }

    /// Seed the shared system categories once, on first startup
    pub async fn seed_defaults(&self) -> Result<(), DomainError> {
        if self.repository.count().await? > 0 {
            return Ok(());
        }

        let defaults = default_categories()?;
        let count = defaults.len();

        for category in defaults {
            self.repository.create(category).await?;
        }

        info!("Seeded {} default categories", count);
        Ok(())
    }
}

fn default_categories() -> Result<Vec<Category>, DomainError> {
    let specs = [
        ("Food & Dining", "Restaurants, groceries, coffee shops", "🍔", "#FF6B6B"),
        ("Transportation", "Gas, public transit, rideshare", "🚗", "#4ECDC4"),
        ("Housing", "Rent, mortgage, utilities", "🏠", "#45B7D1"),
        ("Entertainment", "Movies, games, streaming services", "🎬", "#96CEB4"),
        ("Shopping", "Clothing, electronics, personal items", "🛒", "#FFEAA7"),
        ("Healthcare", "Medical, dental, pharmacy", "💊", "#DDA0DD"),
        ("Utilities", "Electric, water, internet, phone", "💡", "#98D8C8"),
        ("Other", "Miscellaneous expenses", "📦", "#B8B8B8"),
    ];

    specs
        .iter()
        .map(|(name, description, icon, color)| {
            Category::new(
                *name,
                Some((*description).to_string()),
                Some((*icon).to_string()),
                Some((*color).to_string()),
                None,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::category::repository::InMemoryCategoryRepository;

    #[tokio::test]
    async fn test_seed_defaults_once() {
        let repo = Arc::new(InMemoryCategoryRepository::new());
        let service = CategoryService::new(repo.clone());

        service.seed_defaults().await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 8);

        // Second call is a no-op
        service.seed_defaults().await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 8);
    }

    #[tokio::test]
    async fn test_seeded_categories_are_system_defaults() {
        let repo = Arc::new(InMemoryCategoryRepository::new());
        let service = CategoryService::new(repo);

        service.seed_defaults().await.unwrap();

        let visible = service.list_visible(Uuid::new_v4()).await.unwrap();
        assert_eq!(visible.len(), 8);
        assert!(visible.iter().all(|c| c.is_default()));
        assert!(visible.iter().any(|c| c.name() == "Food & Dining"));
    }
}
