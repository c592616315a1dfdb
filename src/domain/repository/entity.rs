//! Translation repository entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{validate_repository_id, RepositoryValidationError};
use crate::domain::storage::{StorageEntity, StorageKey};
use crate::domain::user::UserId;

/// Repository identifier - alphanumeric + hyphens, max 50 characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepositoryId(String);

impl RepositoryId {
    pub fn new(id: impl Into<String>) -> Result<Self, RepositoryValidationError> {
        let id = id.into();
        validate_repository_id(&id)?;
        Ok(Self(id))
    }

    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RepositoryId {
    type Error = RepositoryValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RepositoryId> for String {
    fn from(id: RepositoryId) -> Self {
        id.0
    }
}

impl std::fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StorageKey for RepositoryId {
    fn as_str(&self) -> &str {
        &self.0
    }
}

impl StorageEntity for Repository {
    type Key = RepositoryId;
    const COLLECTION: &'static str = "repositories";

    fn key(&self) -> &Self::Key {
        &self.id
    }
}

/// A repository of translations that API keys are bound to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    id: RepositoryId,
    name: String,
    created_by: UserId,
    created_at: DateTime<Utc>,
}

impl Repository {
    pub fn new(id: RepositoryId, name: impl Into<String>, created_by: UserId) -> Self {
        Self {
            id,
            name: name.into(),
            created_by,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &RepositoryId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_by(&self) -> &UserId {
        &self.created_by
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
