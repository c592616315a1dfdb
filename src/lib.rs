//! Glossa API
//!
//! Backend for a localization-management system:
//! - Translation repositories with per-user permissions
//! - Scoped API keys bound to one repository
//! - JWT authentication for users, `X-API-Key` authentication for keys

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use domain::{ApiKey, Permission, Repository, User};
use infrastructure::{
    api_key::{ApiKeyGenerator, ApiKeyService, StorageApiKeyRepository},
    auth::{JwtConfig, JwtService},
    permission::{PermissionService, StoragePermissionRepository},
    repository::{RepositoryService, StorageRepositoryStore},
    storage::StorageFactory,
    user::{Argon2Hasher, CreateUserRequest, StorageUserRepository, UserService},
};
use tracing::{info, warn};

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let storage_config = config
        .storage
        .to_storage_config()
        .map_err(|e| anyhow::anyhow!("Invalid storage configuration: {}", e))?;

    info!(backend = ?storage_config.storage_type(), "Initializing storage");

    let user_storage = StorageFactory::create::<User>(&storage_config).await?;
    let repository_storage = StorageFactory::create::<Repository>(&storage_config).await?;
    let permission_storage = StorageFactory::create::<Permission>(&storage_config).await?;
    let api_key_storage = StorageFactory::create::<ApiKey>(&storage_config).await?;

    let permission_service = Arc::new(PermissionService::new(Arc::new(
        StoragePermissionRepository::new(permission_storage),
    )));

    let repository_store = Arc::new(StorageRepositoryStore::new(repository_storage));
    let repository_service = Arc::new(RepositoryService::new(
        repository_store.clone(),
        permission_service.clone(),
    ));

    let generator = ApiKeyGenerator::new(config.api_keys.prefix.clone())
        .with_key_bytes(config.api_keys.key_bytes);
    let api_key_service = Arc::new(
        ApiKeyService::new(
            Arc::new(StorageApiKeyRepository::new(api_key_storage)),
            repository_store,
            permission_service.clone(),
        )
        .with_generator(generator),
    );

    let user_service = Arc::new(UserService::new(
        Arc::new(StorageUserRepository::new(user_storage)),
        Arc::new(Argon2Hasher),
    ));

    let jwt_service = Arc::new(JwtService::new(JwtConfig::new(
        config.auth.jwt_secret.clone(),
        config.auth.jwt_expiration_hours,
    )));

    seed_initial_user(&user_service, config).await?;

    Ok(AppState {
        api_key_service,
        repository_service,
        permission_service,
        user_service,
        jwt_service,
    })
}

async fn seed_initial_user(
    user_service: &UserService<StorageUserRepository, Argon2Hasher>,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let (Some(username), Some(password)) = (
        config.auth.initial_username.as_ref(),
        config.auth.initial_password.as_ref(),
    ) else {
        if config.auth.initial_username.is_some() {
            warn!("auth.initial_username is set without auth.initial_password; skipping");
        }
        return Ok(());
    };

    let user = user_service
        .ensure(CreateUserRequest {
            username: username.clone(),
            password: password.clone(),
            name: None,
        })
        .await?;

    info!(user_id = %user.id(), username = %user.username(), "Initial user ready");
    Ok(())
}
