//! Permission repository and checker traits

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{Permission, PermissionType};
use crate::domain::repository::RepositoryId;
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Persistence for repository permissions
#[async_trait]
pub trait PermissionRepository: Send + Sync + Debug {
    /// The permission a user holds on a repository, if any
    async fn get(
        &self,
        user_id: &UserId,
        repository_id: &RepositoryId,
    ) -> Result<Option<Permission>, DomainError>;

    /// Insert or replace the permission for the (user, repository) pair
    async fn save(&self, permission: Permission) -> Result<Permission, DomainError>;

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Permission>, DomainError>;
}

/// Answers access questions about a user and a repository
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PermissionChecker: Send + Sync {
    async fn permission_type(
        &self,
        user_id: &UserId,
        repository_id: &RepositoryId,
    ) -> Result<Option<PermissionType>, DomainError>;

    async fn has_full_access(
        &self,
        user_id: &UserId,
        repository_id: &RepositoryId,
    ) -> Result<bool, DomainError> {
        Ok(self
            .permission_type(user_id, repository_id)
            .await?
            .is_some_and(|p| p.is_full_access()))
    }
}
