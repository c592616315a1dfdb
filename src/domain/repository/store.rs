//! Repository store trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{Repository, RepositoryId};
use crate::domain::DomainError;

/// Persistence for translation repositories
#[async_trait]
pub trait RepositoryStore: Send + Sync + Debug {
    async fn get(&self, id: &RepositoryId) -> Result<Option<Repository>, DomainError>;

    async fn create(&self, repository: Repository) -> Result<Repository, DomainError>;

    async fn list(&self) -> Result<Vec<Repository>, DomainError>;
}
