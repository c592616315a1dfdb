//! Application state for shared services

use std::sync::Arc;

use crate::domain::api_key::{ApiKey, ApiKeyId, ApiKeyRepository, ScopeSet};
use crate::domain::permission::{
    Permission, PermissionChecker, PermissionRepository, PermissionType,
};
use crate::domain::repository::{Repository, RepositoryId, RepositoryStore};
use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::api_key::ApiKeyService;
use crate::infrastructure::auth::JwtGenerator;
use crate::infrastructure::permission::PermissionService;
use crate::infrastructure::repository::RepositoryService;
use crate::infrastructure::user::{CreateUserRequest, PasswordHasher, UserService};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub api_key_service: Arc<dyn ApiKeyServiceTrait>,
    pub repository_service: Arc<dyn RepositoryServiceTrait>,
    pub permission_service: Arc<dyn PermissionServiceTrait>,
    pub user_service: Arc<dyn UserServiceTrait>,
    pub jwt_service: Arc<dyn JwtGenerator>,
}

/// Trait for API key service operations
#[async_trait::async_trait]
pub trait ApiKeyServiceTrait: Send + Sync {
    async fn create(
        &self,
        owner: &UserId,
        scopes: ScopeSet,
        repository_id: &RepositoryId,
    ) -> Result<ApiKey, DomainError>;
    async fn edit(&self, id: &ApiKeyId, scopes: ScopeSet) -> Result<ApiKey, DomainError>;
    async fn get(&self, id: &ApiKeyId) -> Result<Option<ApiKey>, DomainError>;
    async fn get_by_key(&self, secret: &str) -> Result<Option<ApiKey>, DomainError>;
    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<ApiKey>, DomainError>;
    async fn list_for_repository(
        &self,
        caller: &UserId,
        repository_id: &RepositoryId,
    ) -> Result<Vec<ApiKey>, DomainError>;
    async fn delete(&self, caller: &UserId, id: &ApiKeyId) -> Result<ApiKey, DomainError>;
    async fn ensure_can_manage(&self, caller: &UserId, key: &ApiKey) -> Result<(), DomainError>;
    async fn ensure_scopes_grantable(
        &self,
        caller: &UserId,
        repository_id: &RepositoryId,
        scopes: &ScopeSet,
    ) -> Result<(), DomainError>;
}

/// Trait for translation repository operations
#[async_trait::async_trait]
pub trait RepositoryServiceTrait: Send + Sync {
    async fn create(&self, creator: &UserId, name: &str) -> Result<Repository, DomainError>;
    async fn get(&self, id: &RepositoryId) -> Result<Option<Repository>, DomainError>;
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Repository>, DomainError>;
}

/// Trait for permission operations
#[async_trait::async_trait]
pub trait PermissionServiceTrait: Send + Sync {
    async fn grant(
        &self,
        user_id: &UserId,
        repository_id: &RepositoryId,
        permission_type: PermissionType,
    ) -> Result<Permission, DomainError>;
    async fn grant_full_access(
        &self,
        user_id: &UserId,
        repository_id: &RepositoryId,
    ) -> Result<Permission, DomainError>;
    async fn permission_type(
        &self,
        user_id: &UserId,
        repository_id: &RepositoryId,
    ) -> Result<Option<PermissionType>, DomainError>;
    async fn has_full_access(
        &self,
        user_id: &UserId,
        repository_id: &RepositoryId,
    ) -> Result<bool, DomainError>;
}

/// Trait for user account operations
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError>;
    async fn ensure(&self, request: CreateUserRequest) -> Result<User, DomainError>;
    async fn authenticate(&self, username: &str, password: &str)
        -> Result<Option<User>, DomainError>;
    async fn get(&self, id: &str) -> Result<Option<User>, DomainError>;
    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;
}

#[async_trait::async_trait]
impl<R: ApiKeyRepository + 'static> ApiKeyServiceTrait for ApiKeyService<R> {
    async fn create(
        &self,
        owner: &UserId,
        scopes: ScopeSet,
        repository_id: &RepositoryId,
    ) -> Result<ApiKey, DomainError> {
        ApiKeyService::create_api_key(self, owner, scopes, repository_id).await
    }

    async fn edit(&self, id: &ApiKeyId, scopes: ScopeSet) -> Result<ApiKey, DomainError> {
        ApiKeyService::edit_api_key(self, id, scopes).await
    }

    async fn get(&self, id: &ApiKeyId) -> Result<Option<ApiKey>, DomainError> {
        ApiKeyService::get(self, id).await
    }

    async fn get_by_key(&self, secret: &str) -> Result<Option<ApiKey>, DomainError> {
        ApiKeyService::get_by_key(self, secret).await
    }

    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<ApiKey>, DomainError> {
        ApiKeyService::list_for_owner(self, owner).await
    }

    async fn list_for_repository(
        &self,
        caller: &UserId,
        repository_id: &RepositoryId,
    ) -> Result<Vec<ApiKey>, DomainError> {
        ApiKeyService::list_for_repository(self, caller, repository_id).await
    }

    async fn delete(&self, caller: &UserId, id: &ApiKeyId) -> Result<ApiKey, DomainError> {
        ApiKeyService::delete_api_key(self, caller, id).await
    }

    async fn ensure_can_manage(&self, caller: &UserId, key: &ApiKey) -> Result<(), DomainError> {
        ApiKeyService::ensure_can_manage(self, caller, key).await
    }

    async fn ensure_scopes_grantable(
        &self,
        caller: &UserId,
        repository_id: &RepositoryId,
        scopes: &ScopeSet,
    ) -> Result<(), DomainError> {
        ApiKeyService::ensure_scopes_grantable(self, caller, repository_id, scopes).await
    }
}

#[async_trait::async_trait]
impl<S, P> RepositoryServiceTrait for RepositoryService<S, P>
where
    S: RepositoryStore + 'static,
    P: PermissionRepository + 'static,
{
    async fn create(&self, creator: &UserId, name: &str) -> Result<Repository, DomainError> {
        RepositoryService::create(self, creator, name).await
    }

    async fn get(&self, id: &RepositoryId) -> Result<Option<Repository>, DomainError> {
        RepositoryService::get(self, id).await
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Repository>, DomainError> {
        RepositoryService::list_for_user(self, user_id).await
    }
}

#[async_trait::async_trait]
impl<R: PermissionRepository + 'static> PermissionServiceTrait for PermissionService<R> {
    async fn grant(
        &self,
        user_id: &UserId,
        repository_id: &RepositoryId,
        permission_type: PermissionType,
    ) -> Result<Permission, DomainError> {
        PermissionService::grant(self, user_id, repository_id, permission_type).await
    }

    async fn grant_full_access(
        &self,
        user_id: &UserId,
        repository_id: &RepositoryId,
    ) -> Result<Permission, DomainError> {
        PermissionService::grant_full_access(self, user_id, repository_id).await
    }

    async fn permission_type(
        &self,
        user_id: &UserId,
        repository_id: &RepositoryId,
    ) -> Result<Option<PermissionType>, DomainError> {
        PermissionChecker::permission_type(self, user_id, repository_id).await
    }

    async fn has_full_access(
        &self,
        user_id: &UserId,
        repository_id: &RepositoryId,
    ) -> Result<bool, DomainError> {
        PermissionChecker::has_full_access(self, user_id, repository_id).await
    }
}

#[async_trait::async_trait]
impl<R, H> UserServiceTrait for UserService<R, H>
where
    R: UserRepository + 'static,
    H: PasswordHasher + 'static,
{
    async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        UserService::create(self, request).await
    }

    async fn ensure(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        UserService::ensure(self, request).await
    }

    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        UserService::authenticate(self, username, password).await
    }

    async fn get(&self, id: &str) -> Result<Option<User>, DomainError> {
        UserService::get(self, id).await
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        UserService::get_by_username(self, username).await
    }
}
