//! Storage-backed repository store

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::repository::{Repository, RepositoryId, RepositoryStore};
use crate::domain::storage::Storage;
use crate::domain::DomainError;

#[derive(Debug)]
pub struct StorageRepositoryStore {
    storage: Arc<dyn Storage<Repository>>,
}

impl StorageRepositoryStore {
    pub fn new(storage: Arc<dyn Storage<Repository>>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl RepositoryStore for StorageRepositoryStore {
    async fn get(&self, id: &RepositoryId) -> Result<Option<Repository>, DomainError> {
        self.storage.get(id).await
    }

    async fn create(&self, repository: Repository) -> Result<Repository, DomainError> {
        self.storage.create(repository).await
    }

    async fn list(&self) -> Result<Vec<Repository>, DomainError> {
        self.storage.list().await
    }
}
