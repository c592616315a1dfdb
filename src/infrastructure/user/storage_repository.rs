//! Storage-backed user repository

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::storage::Storage;
use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;

#[derive(Debug)]
pub struct StorageUserRepository {
    storage: Arc<dyn Storage<User>>,
}

impl StorageUserRepository {
    pub fn new(storage: Arc<dyn Storage<User>>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl UserRepository for StorageUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        self.storage.get(id).await
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .storage
            .find_by("username", username)
            .await?
            .into_iter()
            .next())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        if self.username_exists(user.username()).await? {
            return Err(DomainError::conflict(format!(
                "Username '{}' already exists",
                user.username()
            )));
        }

        self.storage.create(user).await
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        self.storage.update(user.clone()).await
    }

    async fn record_login(&self, id: &UserId) -> Result<(), DomainError> {
        let mut user = self
            .storage
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))?;

        user.record_login();
        self.storage.update(user).await?;
        Ok(())
    }
}
