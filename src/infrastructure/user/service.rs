//! User service for authentication and account management

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::user::{validate_password, validate_username, User, UserId, UserRepository};
use crate::domain::DomainError;

use super::password::PasswordHasher;

/// Request for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    /// Display name, defaults to the username
    pub name: Option<String>,
}

/// User service for authentication and management
#[derive(Debug)]
pub struct UserService<R: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R: UserRepository, H: PasswordHasher> UserService<R, H> {
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }

    /// Create a new user account
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        validate_username(&request.username)
            .map_err(|e| DomainError::field("username", e.to_string()))?;
        validate_password(&request.password)
            .map_err(|e| DomainError::field("password", e.to_string()))?;

        if self.repository.username_exists(&request.username).await? {
            return Err(DomainError::conflict(format!(
                "Username '{}' already exists",
                request.username
            )));
        }

        let password_hash = self.hasher.hash(&request.password)?;
        let name = request.name.unwrap_or_else(|| request.username.clone());

        let user = User::new(UserId::generate(), &request.username, name, password_hash);
        let created = self.repository.create(user).await?;

        info!(user_id = %created.id(), username = %created.username(), "User created");
        Ok(created)
    }

    /// Return the account with this username, creating it when missing
    pub async fn ensure(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        if let Some(existing) = self.repository.get_by_username(&request.username).await? {
            debug!(username = %existing.username(), "User already present");
            return Ok(existing);
        }

        self.create(request).await
    }

    /// Check credentials; `None` when the username or password is wrong
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        let user = match self.repository.get_by_username(username).await? {
            Some(u) => u,
            None => return Ok(None),
        };

        if !self.hasher.verify(password, user.password_hash()) {
            debug!(username = %username, "Password verification failed");
            return Ok(None);
        }

        self.repository.record_login(user.id()).await?;

        // Re-fetch to pick up last_login_at
        self.repository.get(user.id()).await
    }

    pub async fn get(&self, id: &str) -> Result<Option<User>, DomainError> {
        let user_id = UserId::new(id).map_err(|e| DomainError::invalid_id(e.to_string()))?;
        self.repository.get(&user_id).await
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        self.repository.get_by_username(username).await
    }
}
