//! Storage-backed permission repository

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::permission::{Permission, PermissionId, PermissionRepository};
use crate::domain::repository::RepositoryId;
use crate::domain::storage::Storage;
use crate::domain::user::UserId;
use crate::domain::DomainError;

#[derive(Debug)]
pub struct StoragePermissionRepository {
    storage: Arc<dyn Storage<Permission>>,
}

impl StoragePermissionRepository {
    pub fn new(storage: Arc<dyn Storage<Permission>>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl PermissionRepository for StoragePermissionRepository {
    async fn get(
        &self,
        user_id: &UserId,
        repository_id: &RepositoryId,
    ) -> Result<Option<Permission>, DomainError> {
        self.storage
            .get(&PermissionId::for_pair(user_id, repository_id))
            .await
    }

    async fn save(&self, permission: Permission) -> Result<Permission, DomainError> {
        self.storage.save(permission).await
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Permission>, DomainError> {
        self.storage.find_by("user_id", user_id.as_str()).await
    }
}
