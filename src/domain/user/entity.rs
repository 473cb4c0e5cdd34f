//! User entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// Role of a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Regular user
    #[default]
    User,
    /// Administrator (may list all users)
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "admin" => Self::Admin,
            _ => Self::User,
        }
    }
}

/// User entity for authentication and ownership
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    id: Uuid,
    /// Stored lower-cased; unique across users
    email: String,
    /// Argon2 password hash - never exposed in serialization
    #[serde(skip_serializing)]
    password_hash: String,
    first_name: String,
    last_name: String,
    role: UserRole,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user, enforcing the email/password-hash invariants
    pub fn new(
        email: impl Into<String>,
        password_hash: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let email = email.into();
        let password_hash = password_hash.into();

        if email.trim().is_empty() {
            return Err(DomainError::validation_field("email", "Email is required"));
        }

        if password_hash.trim().is_empty() {
            return Err(DomainError::validation_field(
                "password",
                "Password is required",
            ));
        }

        let now = Utc::now();

        Ok(Self {
            id: Uuid::new_v4(),
            email: email.to_lowercase(),
            password_hash,
            first_name: first_name.into(),
            last_name: last_name.into(),
            role: UserRole::User,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstruct a user from stored fields (repository restore)
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: Uuid,
        email: String,
        password_hash: String,
        first_name: String,
        last_name: String,
        role: UserRole,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            password_hash,
            first_name,
            last_name,
            role,
            created_at,
            updated_at,
        }
    }

    // Getters

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn role(&self) -> UserRole {
        self.role
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Mutators

    /// Update first/last name
    pub fn update_profile(&mut self, first_name: impl Into<String>, last_name: impl Into<String>) {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self.touch();
    }

    /// Replace the password hash
    pub fn update_password(&mut self, password_hash: impl Into<String>) {
        self.password_hash = password_hash.into();
        self.touch();
    }

    pub fn set_role(&mut self, role: UserRole) {
        self.role = role;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user() -> User {
        User::new("Ada@Example.com", "hashed_password", "Ada", "Lovelace").unwrap()
    }

    #[test]
    fn test_user_creation_lowercases_email() {
        let user = create_test_user();
        assert_eq!(user.email(), "ada@example.com");
        assert_eq!(user.full_name(), "Ada Lovelace");
        assert_eq!(user.role(), UserRole::User);
    }

    #[test]
    fn test_user_creation_requires_email() {
        let result = User::new("  ", "hash", "Ada", "Lovelace");
        assert!(result.is_err());
    }

    #[test]
    fn test_user_creation_requires_password_hash() {
        let result = User::new("ada@example.com", "", "Ada", "Lovelace");
        assert!(result.is_err());
    }

    #[test]
    fn test_user_update_profile() {
        let mut user = create_test_user();
        user.update_profile("Augusta", "King");
        assert_eq!(user.first_name(), "Augusta");
        assert_eq!(user.last_name(), "King");
    }

    #[test]
    fn test_user_update_password() {
        let mut user = create_test_user();
        let original_updated = user.updated_at();

        std::thread::sleep(std::time::Duration::from_millis(10));

        user.update_password("new_hash");
        assert_eq!(user.password_hash(), "new_hash");
        assert!(user.updated_at() > original_updated);
    }

    #[test]
    fn test_user_serialization_excludes_password() {
        let user = create_test_user();

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("hashed_password"));
        assert!(!json.contains("password_hash"));
    }

    #[test]
    fn test_role_conversion() {
        assert_eq!(UserRole::from_str("admin"), UserRole::Admin);
        assert_eq!(UserRole::from_str("user"), UserRole::User);
        assert_eq!(UserRole::from_str("unknown"), UserRole::User);
        assert_eq!(UserRole::Admin.as_str(), "admin");
    }
}
