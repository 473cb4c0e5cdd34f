//! In-memory category repository

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use crate::domain::category::{Category, CategoryRepository};
use crate::domain::DomainError;

/// In-memory implementation of CategoryRepository
#[derive(Debug, Default)]
pub struct InMemoryCategoryRepository {
    categories: RwLock<HashMap<Uuid, Category>>,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn get(&self, id: Uuid) -> Result<Option<Category>, DomainError> {
        Ok(self.categories.read().unwrap().get(&id).cloned())
    }

    async fn list_visible(&self, user_id: Uuid) -> Result<Vec<Category>, DomainError> {
        let mut visible: Vec<Category> = self
            .categories
            .read()
            .unwrap()
            .values()
            .filter(|c| c.is_visible_to(user_id))
            .cloned()
            .collect();

        // Defaults first, then alphabetical
        visible.sort_by(|a, b| {
            b.is_default()
                .cmp(&a.is_default())
                .then_with(|| a.name().cmp(b.name()))
        });

        Ok(visible)
    }

    async fn visible_exists(&self, id: Uuid, user_id: Uuid) -> Result<bool, DomainError> {
        Ok(self
            .categories
            .read()
            .unwrap()
            .get(&id)
            .is_some_and(|c| c.is_visible_to(user_id)))
    }

    async fn create(&self, category: Category) -> Result<Category, DomainError> {
        self.categories
            .write()
            .unwrap()
            .insert(category.id(), category.clone());
        Ok(category)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.categories.read().unwrap().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_visible_excludes_other_users() {
        let repo = InMemoryCategoryRepository::new();
        let user_a = Uuid::new_v4();
        let user_b = Uuid::new_v4();

        repo.create(Category::new("Other", None, None, None, None).unwrap())
            .await
            .unwrap();
        repo.create(Category::new("Hobbies", None, None, None, Some(user_a)).unwrap())
            .await
            .unwrap();

        let for_a = repo.list_visible(user_a).await.unwrap();
        let for_b = repo.list_visible(user_b).await.unwrap();

        assert_eq!(for_a.len(), 2);
        assert_eq!(for_b.len(), 1);
        // System category sorts first
        assert_eq!(for_a[0].name(), "Other");
    }

    #[tokio::test]
    async fn test_visible_exists() {
        let repo = InMemoryCategoryRepository::new();
        let owner = Uuid::new_v4();

        let category = repo
            .create(Category::new("Hobbies", None, None, None, Some(owner)).unwrap())
            .await
            .unwrap();

        assert!(repo.visible_exists(category.id(), owner).await.unwrap());
        assert!(!repo
            .visible_exists(category.id(), Uuid::new_v4())
            .await
            .unwrap());
        assert!(!repo.visible_exists(Uuid::new_v4(), owner).await.unwrap());
    }
}
