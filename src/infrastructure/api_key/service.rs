//! API Key service
//!
//! Issues, edits, lists and deletes repository-scoped API keys. Authorization
//! questions are delegated to a [`PermissionChecker`].

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::api_key::{
    validate_scopes, ApiKey, ApiKeyId, ApiKeyRepository, ScopeSet, SCOPES_FIELD,
};
use crate::domain::permission::PermissionChecker;
use crate::domain::repository::{RepositoryId, RepositoryStore};
use crate::domain::user::UserId;
use crate::domain::DomainError;

use super::generator::ApiKeyGenerator;

/// API Key service
pub struct ApiKeyService<R>
where
    R: ApiKeyRepository,
{
    repository: Arc<R>,
    repositories: Arc<dyn RepositoryStore>,
    permissions: Arc<dyn PermissionChecker>,
    generator: ApiKeyGenerator,
}

impl<R: ApiKeyRepository> fmt::Debug for ApiKeyService<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyService")
            .field("repository", &self.repository)
            .field("generator", &self.generator)
            .finish_non_exhaustive()
    }
}

impl<R: ApiKeyRepository> ApiKeyService<R> {
    pub fn new(
        repository: Arc<R>,
        repositories: Arc<dyn RepositoryStore>,
        permissions: Arc<dyn PermissionChecker>,
    ) -> Self {
        Self {
            repository,
            repositories,
            permissions,
            generator: ApiKeyGenerator::default(),
        }
    }

    pub fn with_generator(mut self, generator: ApiKeyGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// Issue a new key for `owner` on a repository.
    ///
    /// No permission checks happen here; callers acting for a user go through
    /// [`Self::ensure_scopes_grantable`] first.
    pub async fn create_api_key(
        &self,
        owner: &UserId,
        scopes: ScopeSet,
        repository_id: &RepositoryId,
    ) -> Result<ApiKey, DomainError> {
        validate_scopes(&scopes)?;
        self.require_repository(repository_id).await?;

        let generated = self.generator.generate();
        let api_key = ApiKey::new(
            ApiKeyId::generate(),
            generated.key,
            generated.hash,
            owner.clone(),
            repository_id.clone(),
            scopes,
        );

        let created = self.repository.create(api_key).await?;

        info!(
            api_key_id = %created.id(),
            owner_id = %owner,
            repository_id = %repository_id,
            "API key created"
        );

        Ok(created)
    }

    /// Replace the scope set of an existing key
    pub async fn edit_api_key(&self, id: &ApiKeyId, scopes: ScopeSet) -> Result<ApiKey, DomainError> {
        validate_scopes(&scopes)?;

        let mut key = self.require_key(id).await?;
        key.set_scopes(scopes);

        let updated = self.repository.update(&key).await?;
        info!(api_key_id = %id, "API key scopes replaced");

        Ok(updated)
    }

    /// Keys owned by the caller, oldest first
    pub async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<ApiKey>, DomainError> {
        debug!(owner_id = %owner, "Listing API keys for owner");

        let mut keys = self.repository.list_by_owner(owner).await?;
        keys.sort_by_key(|k| k.created_at());
        Ok(keys)
    }

    /// Every key of a repository; requires full access
    pub async fn list_for_repository(
        &self,
        caller: &UserId,
        repository_id: &RepositoryId,
    ) -> Result<Vec<ApiKey>, DomainError> {
        self.require_repository(repository_id).await?;

        if !self.permissions.has_full_access(caller, repository_id).await? {
            return Err(DomainError::forbidden(format!(
                "Full access to repository '{}' is required",
                repository_id
            )));
        }

        let mut keys = self.repository.list_by_repository(repository_id).await?;
        keys.sort_by_key(|k| k.created_at());
        Ok(keys)
    }

    pub async fn get(&self, id: &ApiKeyId) -> Result<Option<ApiKey>, DomainError> {
        self.repository.get(id).await
    }

    /// Resolve a presented secret; records usage on success
    pub async fn get_by_key(&self, secret: &str) -> Result<Option<ApiKey>, DomainError> {
        let hash = self.generator.hash_key(secret);

        let Some(mut key) = self.repository.get_by_hash(&hash).await? else {
            debug!("No API key matches the presented secret");
            return Ok(None);
        };

        if !self.generator.verify_key(secret, key.key_hash()) {
            return Ok(None);
        }

        match self.repository.record_usage(key.id()).await {
            Ok(()) => key.record_usage(),
            Err(e) => warn!(api_key_id = %key.id(), "Failed to record API key usage: {}", e),
        }

        Ok(Some(key))
    }

    /// Delete a key the caller may manage, returning the removed key
    pub async fn delete_api_key(&self, caller: &UserId, id: &ApiKeyId) -> Result<ApiKey, DomainError> {
        let key = self.require_key(id).await?;
        self.ensure_can_manage(caller, &key).await?;

        self.repository.delete(id).await?;
        info!(api_key_id = %id, deleted_by = %caller, "API key deleted");

        Ok(key)
    }

    /// The owner, or anyone with full access to the key's repository, may manage it
    pub async fn ensure_can_manage(&self, caller: &UserId, key: &ApiKey) -> Result<(), DomainError> {
        if key.is_owned_by(caller)
            || self
                .permissions
                .has_full_access(caller, key.repository_id())
                .await?
        {
            return Ok(());
        }

        Err(DomainError::forbidden(format!(
            "Not allowed to manage API key '{}'",
            key.id()
        )))
    }

    /// The caller must hold a permission on the repository that covers every scope
    pub async fn ensure_scopes_grantable(
        &self,
        caller: &UserId,
        repository_id: &RepositoryId,
        scopes: &ScopeSet,
    ) -> Result<(), DomainError> {
        let permission = self
            .permissions
            .permission_type(caller, repository_id)
            .await?
            .ok_or_else(|| {
                DomainError::forbidden(format!(
                    "No permission on repository '{}'",
                    repository_id
                ))
            })?;

        let allowed = permission.scopes();
        let denied: Vec<&str> = scopes
            .difference(&allowed)
            .map(|s| s.as_str())
            .collect();

        if denied.is_empty() {
            Ok(())
        } else {
            Err(DomainError::field(
                SCOPES_FIELD,
                format!("not allowed for {} permission: {}", permission, denied.join(", ")),
            ))
        }
    }

    async fn require_key(&self, id: &ApiKeyId) -> Result<ApiKey, DomainError> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("API key '{}' not found", id)))
    }

    async fn require_repository(&self, id: &RepositoryId) -> Result<(), DomainError> {
        if self.repositories.get(id).await?.is_none() {
            return Err(DomainError::not_found(format!("Repository '{}' not found", id)));
        }
        Ok(())
    }
}
