//! Storage-backed API key repository implementation

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::api_key::{ApiKey, ApiKeyId, ApiKeyRepository};
use crate::domain::repository::RepositoryId;
use crate::domain::storage::Storage;
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Storage-backed implementation of ApiKeyRepository
#[derive(Debug)]
pub struct StorageApiKeyRepository {
    storage: Arc<dyn Storage<ApiKey>>,
}

impl StorageApiKeyRepository {
    pub fn new(storage: Arc<dyn Storage<ApiKey>>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl ApiKeyRepository for StorageApiKeyRepository {
    async fn get(&self, id: &ApiKeyId) -> Result<Option<ApiKey>, DomainError> {
        self.storage.get(id).await
    }

    async fn get_by_hash(&self, key_hash: &str) -> Result<Option<ApiKey>, DomainError> {
        Ok(self
            .storage
            .find_by("key_hash", key_hash)
            .await?
            .into_iter()
            .next())
    }

    async fn create(&self, api_key: ApiKey) -> Result<ApiKey, DomainError> {
        if self.get_by_hash(api_key.key_hash()).await?.is_some() {
            return Err(DomainError::conflict("API key secret already in use"));
        }

        self.storage.create(api_key).await
    }

    async fn update(&self, api_key: &ApiKey) -> Result<ApiKey, DomainError> {
        if !self.storage.exists(api_key.id()).await? {
            return Err(DomainError::not_found(format!(
                "API key '{}' not found",
                api_key.id()
            )));
        }

        self.storage.update(api_key.clone()).await
    }

    async fn delete(&self, id: &ApiKeyId) -> Result<bool, DomainError> {
        self.storage.delete(id).await
    }

    async fn list_by_owner(&self, owner_id: &UserId) -> Result<Vec<ApiKey>, DomainError> {
        self.storage.find_by("owner_id", owner_id.as_str()).await
    }

    async fn list_by_repository(
        &self,
        repository_id: &RepositoryId,
    ) -> Result<Vec<ApiKey>, DomainError> {
        self.storage
            .find_by("repository_id", repository_id.as_str())
            .await
    }

    async fn record_usage(&self, id: &ApiKeyId) -> Result<(), DomainError> {
        let mut key = self
            .storage
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("API key '{}' not found", id)))?;

        key.record_usage();
        self.storage.update(key).await?;
        Ok(())
    }
}
