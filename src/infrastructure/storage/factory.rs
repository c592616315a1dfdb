//! Storage factory for runtime backend selection

use std::str::FromStr;
use std::sync::Arc;

use crate::domain::storage::{Storage, StorageEntity};
use crate::domain::DomainError;

use super::in_memory::InMemoryStorage;
use super::postgres::{PostgresConfig, PostgresStorage};

/// Supported storage backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    InMemory,
    Postgres,
}

impl FromStr for StorageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Ok(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            other => Err(format!("Unknown storage backend: {}", other)),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    InMemory,
    Postgres(PostgresConfig),
}

impl StorageConfig {
    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }
}

/// Creates one storage per entity collection
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Creates the storage for `E`, named after its collection
    pub async fn create<E>(config: &StorageConfig) -> Result<Arc<dyn Storage<E>>, DomainError>
    where
        E: StorageEntity + 'static,
    {
        match config {
            StorageConfig::InMemory => Ok(Arc::new(InMemoryStorage::<E>::new())),
            StorageConfig::Postgres(pg_config) => {
                let storage = PostgresStorage::<E>::connect(pg_config, E::COLLECTION).await?;
                storage.ensure_table().await?;
                Ok(Arc::new(storage))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repository::{Repository, RepositoryId};
    use crate::domain::user::UserId;

    #[test]
    fn test_storage_type_from_str() {
        assert_eq!("memory".parse(), Ok(StorageType::InMemory));
        assert_eq!("in-memory".parse(), Ok(StorageType::InMemory));
        assert_eq!("postgres".parse(), Ok(StorageType::Postgres));
        assert_eq!("PG".parse(), Ok(StorageType::Postgres));
        assert!("sqlite".parse::<StorageType>().is_err());
    }

    #[test]
    fn test_storage_config_types() {
        assert_eq!(StorageConfig::InMemory.storage_type(), StorageType::InMemory);

        let postgres = StorageConfig::Postgres(PostgresConfig::new("postgres://localhost/test"));
        assert_eq!(postgres.storage_type(), StorageType::Postgres);
    }

    #[tokio::test]
    async fn test_create_in_memory() {
        let storage = StorageFactory::create::<Repository>(&StorageConfig::InMemory)
            .await
            .unwrap();

        let repo = Repository::new(
            RepositoryId::new("repo-1").unwrap(),
            "Website",
            UserId::new("ben").unwrap(),
        );
        storage.create(repo).await.unwrap();

        assert_eq!(storage.count().await.unwrap(), 1);
    }
}
