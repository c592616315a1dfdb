//! Domain layer - Core business logic and entities

pub mod api_key;
pub mod error;
pub mod permission;
pub mod repository;
pub mod storage;
pub mod user;

pub use api_key::{
    ApiKey, ApiKeyId, ApiKeyRepository, ApiKeyValidationError, ApiScope, ScopeSet,
};
pub use error::{DomainError, FieldErrors};
pub use permission::{Permission, PermissionChecker, PermissionRepository, PermissionType};
pub use repository::{Repository, RepositoryId, RepositoryStore};
pub use storage::{Storage, StorageEntity, StorageKey};
pub use user::{User, UserId, UserRepository};
