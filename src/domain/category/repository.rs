//! Category repository trait

use async_trait::async_trait;
use uuid::Uuid;

use super::Category;
use crate::domain::DomainError;

/// Repository for category persistence
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Get a category by ID
    async fn get(&self, id: Uuid) -> Result<Option<Category>, DomainError>;

    /// List categories visible to a user (system + own),
    /// defaults first, then alphabetical
    async fn list_visible(&self, user_id: Uuid) -> Result<Vec<Category>, DomainError>;

    /// Check whether a category exists and is visible to the user
    async fn visible_exists(&self, id: Uuid, user_id: Uuid) -> Result<bool, DomainError>;

    /// Persist a new category
    async fn create(&self, category: Category) -> Result<Category, DomainError>;

    /// Total number of categories (used for the startup seed check)
    async fn count(&self) -> Result<usize, DomainError>;
}
