//! API Key repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{ApiKey, ApiKeyId};
use crate::domain::repository::RepositoryId;
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Repository trait for API key storage
#[async_trait]
pub trait ApiKeyRepository: Send + Sync + Debug {
    /// Get an API key by its ID
    async fn get(&self, id: &ApiKeyId) -> Result<Option<ApiKey>, DomainError>;

    /// Get an API key by the hash of its secret
    async fn get_by_hash(&self, key_hash: &str) -> Result<Option<ApiKey>, DomainError>;

    /// Create a new API key
    async fn create(&self, api_key: ApiKey) -> Result<ApiKey, DomainError>;

    /// Update an existing API key
    async fn update(&self, api_key: &ApiKey) -> Result<ApiKey, DomainError>;

    /// Delete an API key
    async fn delete(&self, id: &ApiKeyId) -> Result<bool, DomainError>;

    /// Keys owned by a user
    async fn list_by_owner(&self, owner_id: &UserId) -> Result<Vec<ApiKey>, DomainError>;

    /// Keys bound to a repository, regardless of owner
    async fn list_by_repository(
        &self,
        repository_id: &RepositoryId,
    ) -> Result<Vec<ApiKey>, DomainError>;

    /// Record usage of an API key
    async fn record_usage(&self, id: &ApiKeyId) -> Result<(), DomainError>;
}
