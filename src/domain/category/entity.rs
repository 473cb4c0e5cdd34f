//! Category entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// Expense category. System categories have no owning user and are visible
/// to everyone; user categories are visible to their owner only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    id: Uuid,
    name: String,
    description: Option<String>,
    icon: Option<String>,
    color: Option<String>,
    /// None for system categories
    user_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Category {
    /// Create a new category; pass `user_id: None` for a system category
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        icon: Option<String>,
        color: Option<String>,
        user_id: Option<Uuid>,
    ) -> Result<Self, DomainError> {
        let name = name.into();

        if name.trim().is_empty() {
            return Err(DomainError::validation_field(
                "name",
                "Category name is required",
            ));
        }

        let now = Utc::now();

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            description,
            icon,
            color,
            user_id,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstruct a category from stored fields (repository restore)
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: Uuid,
        name: String,
        description: Option<String>,
        icon: Option<String>,
        color: Option<String>,
        user_id: Option<Uuid>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            icon,
            color,
            user_id,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.user_id
    }

    /// System categories (no owner) are the defaults shared by all users
    pub fn is_default(&self) -> bool {
        self.user_id.is_none()
    }

    /// Whether this category can be used by the given user
    pub fn is_visible_to(&self, user_id: Uuid) -> bool {
        match self.user_id {
            None => true,
            Some(owner) => owner == user_id,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Update the editable fields
    pub fn update(
        &mut self,
        name: impl Into<String>,
        description: Option<String>,
        icon: Option<String>,
        color: Option<String>,
    ) -> Result<(), DomainError> {
        let name = name.into();

        if name.trim().is_empty() {
            return Err(DomainError::validation_field(
                "name",
                "Category name is required",
            ));
        }

        self.name = name;
        self.description = description;
        self.icon = icon;
        self.color = color;
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_category_is_default() {
        let category = Category::new("Food & Dining", None, None, None, None).unwrap();
        assert!(category.is_default());
        assert!(category.is_visible_to(Uuid::new_v4()));
    }

    #[test]
    fn test_user_category_visibility() {
        let owner = Uuid::new_v4();
        let category = Category::new("Hobbies", None, None, None, Some(owner)).unwrap();

        assert!(!category.is_default());
        assert!(category.is_visible_to(owner));
        assert!(!category.is_visible_to(Uuid::new_v4()));
    }

    #[test]
    fn test_category_requires_name() {
        assert!(Category::new("", None, None, None, None).is_err());
        assert!(Category::new("   ", None, None, None, None).is_err());
    }

    #[test]
    fn test_category_update() {
        let mut category = Category::new("Food", None, None, None, None).unwrap();

        category
            .update("Food & Dining", Some("Meals out".to_string()), None, None)
            .unwrap();

        assert_eq!(category.name(), "Food & Dining");
        assert_eq!(category.description(), Some("Meals out"));
    }
}
