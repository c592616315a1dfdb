//! Translation repository service

use std::sync::Arc;

use tracing::info;

use crate::domain::permission::PermissionRepository;
use crate::domain::repository::{validate_repository_name, Repository, RepositoryId, RepositoryStore};
use crate::domain::user::UserId;
use crate::domain::DomainError;
use crate::infrastructure::permission::PermissionService;

#[derive(Debug)]
pub struct RepositoryService<S: RepositoryStore, P: PermissionRepository> {
    store: Arc<S>,
    permissions: Arc<PermissionService<P>>,
}

impl<S: RepositoryStore, P: PermissionRepository> RepositoryService<S, P> {
    pub fn new(store: Arc<S>, permissions: Arc<PermissionService<P>>) -> Self {
        Self { store, permissions }
    }

    /// Create a repository; the creator receives full access
    pub async fn create(&self, creator: &UserId, name: &str) -> Result<Repository, DomainError> {
        validate_repository_name(name).map_err(|e| DomainError::field("name", e.to_string()))?;

        let repository = Repository::new(RepositoryId::generate(), name.trim(), creator.clone());
        let created = self.store.create(repository).await?;

        self.permissions
            .grant_full_access(creator, created.id())
            .await?;

        info!(repository_id = %created.id(), created_by = %creator, "Repository created");
        Ok(created)
    }

    pub async fn get(&self, id: &RepositoryId) -> Result<Option<Repository>, DomainError> {
        self.store.get(id).await
    }

    /// Repositories the user holds any permission on, oldest first
    pub async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Repository>, DomainError> {
        let mut repositories = Vec::new();

        for permission in self.permissions.list_for_user(user_id).await? {
            if let Some(repository) = self.store.get(permission.repository_id()).await? {
                repositories.push(repository);
            }
        }

        repositories.sort_by_key(|r| r.created_at());
        Ok(repositories)
    }
}
