//! User repository trait

use async_trait::async_trait;
use uuid::Uuid;

use super::User;
use crate::domain::DomainError;

/// Repository for user persistence
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Get a user by ID
    async fn get(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Get a user by email (case-insensitive; emails are stored lower-cased)
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Check whether an email is already registered
    async fn email_exists(&self, email: &str) -> Result<bool, DomainError>;

    /// Persist a new user
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Update an existing user
    async fn update(&self, user: &User) -> Result<User, DomainError>;

    /// List all users, oldest first
    async fn list(&self) -> Result<Vec<User>, DomainError>;
}
