//! Permission service
//!
//! Grants repository access levels and answers access checks.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::permission::{
    Permission, PermissionChecker, PermissionRepository, PermissionType,
};
use crate::domain::repository::RepositoryId;
use crate::domain::user::UserId;
use crate::domain::DomainError;

#[derive(Debug)]
pub struct PermissionService<R: PermissionRepository> {
    repository: Arc<R>,
}

impl<R: PermissionRepository> PermissionService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Grant `permission_type`, replacing any previous grant for the pair
    pub async fn grant(
        &self,
        user_id: &UserId,
        repository_id: &RepositoryId,
        permission_type: PermissionType,
    ) -> Result<Permission, DomainError> {
        let permission = match self.repository.get(user_id, repository_id).await? {
            Some(mut existing) => {
                existing.set_permission_type(permission_type);
                existing
            }
            None => Permission::new(user_id.clone(), repository_id.clone(), permission_type),
        };

        let saved = self.repository.save(permission).await?;

        info!(
            user_id = %user_id,
            repository_id = %repository_id,
            permission = %permission_type,
            "Permission granted"
        );

        Ok(saved)
    }

    pub async fn grant_full_access(
        &self,
        user_id: &UserId,
        repository_id: &RepositoryId,
    ) -> Result<Permission, DomainError> {
        self.grant(user_id, repository_id, PermissionType::Manage).await
    }

    pub async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Permission>, DomainError> {
        self.repository.list_by_user(user_id).await
    }
}

#[async_trait]
impl<R: PermissionRepository> PermissionChecker for PermissionService<R> {
    async fn permission_type(
        &self,
        user_id: &UserId,
        repository_id: &RepositoryId,
    ) -> Result<Option<PermissionType>, DomainError> {
        Ok(self
            .repository
            .get(user_id, repository_id)
            .await?
            .map(|p| p.permission_type()))
    }
}
