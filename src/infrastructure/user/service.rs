//! User service for registration, authentication, and profile management

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::user::{User, UserRepository};
use crate::domain::DomainError;

use super::password::PasswordHasher;

const MIN_PASSWORD_LENGTH: usize = 8;

/// Request for registering a new user
#[derive(Debug, Clone)]
pub struct RegisterUserRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// User service for registration and authentication
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { repository, hasher }
    }

    /// Register a new user
    pub async fn register(&self, request: RegisterUserRequest) -> Result<User, DomainError> {
        validate_email(&request.email)?;
        validate_password(&request.password)?;

        if self.repository.email_exists(&request.email).await? {
            return Err(DomainError::validation_field(
                "email",
                "Email is already registered",
            ));
        }

        let password_hash = self.hasher.hash(&request.password)?;

        let user = User::new(
            request.email,
            password_hash,
            request.first_name,
            request.last_name,
        )?;

        self.repository.create(user).await
    }

    /// Authenticate a user with email and password.
    /// Returns None on unknown email or wrong password - the caller must not
    /// reveal which.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        let user = match self.repository.get_by_email(email).await? {
            Some(u) => u,
            None => return Ok(None),
        };

        if !self.hasher.verify(password, user.password_hash()) {
            return Ok(None);
        }

        Ok(Some(user))
    }

    /// Get a user by ID
    pub async fn get(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        self.repository.get(id).await
    }

    /// List all users (admin surface)
    pub async fn list(&self) -> Result<Vec<User>, DomainError> {
        self.repository.list().await
    }
}

fn validate_email(email: &str) -> Result<(), DomainError> {
    let email = email.trim();

    if email.is_empty() {
        return Err(DomainError::validation_field("email", "Email is required"));
    }

    if !email.contains('@') {
        return Err(DomainError::validation_field(
            "email",
            "Email must be a valid address",
        ));
    }

    Ok(())
}

fn validate_password(password: &str) -> Result<(), DomainError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(DomainError::validation_field(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::user::password::Argon2Hasher;
    use crate::infrastructure::user::repository::InMemoryUserRepository;

    fn create_service() -> UserService {
        UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(Argon2Hasher::new()),
        )
    }

    fn make_request(email: &str, password: &str) -> RegisterUserRequest {
        RegisterUserRequest {
            email: email.to_string(),
            password: password.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_user() {
        let service = create_service();

        let user = service
            .register(make_request("Test@Example.com", "secure_password123"))
            .await
            .unwrap();

        assert_eq!(user.email(), "test@example.com");
        assert_ne!(user.password_hash(), "secure_password123");
    }

    #[tokio::test]
    async fn test_register_rejects_short_password() {
        let service = create_service();

        let result = service.register(make_request("a@example.com", "short")).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_email() {
        let service = create_service();

        let result = service
            .register(make_request("not-an-email", "secure_password123"))
            .await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let service = create_service();

        service
            .register(make_request("a@example.com", "secure_password123"))
            .await
            .unwrap();

        let result = service
            .register(make_request("A@EXAMPLE.COM", "other_password456"))
            .await;

        match result {
            Err(DomainError::Validation { field, .. }) => {
                assert_eq!(field.as_deref(), Some("email"));
            }
            other => panic!("expected validation error, got {:?}", other.map(|u| u.id())),
        }
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let service = create_service();

        service
            .register(make_request("a@example.com", "secure_password123"))
            .await
            .unwrap();

        let user = service
            .authenticate("a@example.com", "secure_password123")
            .await
            .unwrap();

        assert!(user.is_some());
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password() {
        let service = create_service();

        service
            .register(make_request("a@example.com", "secure_password123"))
            .await
            .unwrap();

        let user = service
            .authenticate("a@example.com", "wrong_password")
            .await
            .unwrap();

        assert!(user.is_none());
    }

    #[tokio::test]
    async fn test_authenticate_unknown_email() {
        let service = create_service();

        let user = service
            .authenticate("nobody@example.com", "whatever123")
            .await
            .unwrap();

        assert!(user.is_none());
    }
}
