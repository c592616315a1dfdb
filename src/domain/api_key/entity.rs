//! API Key entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::scope::{ApiScope, ScopeSet};
use super::validation::{validate_api_key_id, ApiKeyValidationError};
use crate::domain::repository::RepositoryId;
use crate::domain::storage::{StorageEntity, StorageKey};
use crate::domain::user::UserId;

/// API Key identifier - alphanumeric + hyphens, max 50 characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApiKeyId(String);

impl ApiKeyId {
    /// Create a new ApiKeyId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, ApiKeyValidationError> {
        let id = id.into();
        validate_api_key_id(&id)?;
        Ok(Self(id))
    }

    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ApiKeyId {
    type Error = ApiKeyValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ApiKeyId> for String {
    fn from(id: ApiKeyId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ApiKeyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StorageKey for ApiKeyId {
    fn as_str(&self) -> &str {
        &self.0
    }
}

impl StorageEntity for ApiKey {
    type Key = ApiKeyId;
    const COLLECTION: &'static str = "api_keys";

    fn key(&self) -> &Self::Key {
        &self.id
    }
}

/// API Key entity
///
/// A key belongs to exactly one user and grants its scopes on exactly one
/// repository. The scope set is never empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKey {
    id: ApiKeyId,
    /// The secret value presented by clients
    key: String,
    /// Hash of the secret, used for lookups
    key_hash: String,
    owner_id: UserId,
    repository_id: RepositoryId,
    scopes: ScopeSet,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_used_at: Option<DateTime<Utc>>,
}

impl ApiKey {
    /// Create a new API key
    pub fn new(
        id: ApiKeyId,
        key: impl Into<String>,
        key_hash: impl Into<String>,
        owner_id: UserId,
        repository_id: RepositoryId,
        scopes: ScopeSet,
    ) -> Self {
        let now = Utc::now();

        Self {
            id,
            key: key.into(),
            key_hash: key_hash.into(),
            owner_id,
            repository_id,
            scopes,
            created_at: now,
            updated_at: now,
            last_used_at: None,
        }
    }

    // Getters

    pub fn id(&self) -> &ApiKeyId {
        &self.id
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn key_hash(&self) -> &str {
        &self.key_hash
    }

    pub fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    pub fn repository_id(&self) -> &RepositoryId {
        &self.repository_id
    }

    pub fn scopes(&self) -> &ScopeSet {
        &self.scopes
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn last_used_at(&self) -> Option<DateTime<Utc>> {
        self.last_used_at
    }

    /// Check whether the key grants a scope
    pub fn has_scope(&self, scope: ApiScope) -> bool {
        self.scopes.contains(&scope)
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.owner_id == user_id
    }

    // Mutators

    /// Replace the scope set wholesale
    pub fn set_scopes(&mut self, scopes: ScopeSet) {
        self.scopes = scopes;
        self.touch();
    }

    /// Record key usage
    pub fn record_usage(&mut self) {
        self.last_used_at = Some(Utc::now());
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
