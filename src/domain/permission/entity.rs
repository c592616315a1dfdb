//! Repository permission entity

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::api_key::{ApiScope, ScopeSet};
use crate::domain::repository::RepositoryId;
use crate::domain::storage::{StorageEntity, StorageKey};
use crate::domain::user::UserId;

/// Access level a user holds on a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PermissionType {
    View,
    Translate,
    Edit,
    Manage,
}

impl PermissionType {
    pub const ALL: [PermissionType; 4] = [Self::View, Self::Translate, Self::Edit, Self::Manage];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "VIEW",
            Self::Translate => "TRANSLATE",
            Self::Edit => "EDIT",
            Self::Manage => "MANAGE",
        }
    }

    /// Scopes an API key created under this permission may carry
    pub fn scopes(&self) -> ScopeSet {
        match self {
            Self::View => [ApiScope::TranslationsView].into_iter().collect(),
            Self::Translate => [ApiScope::TranslationsView, ApiScope::TranslationsEdit]
                .into_iter()
                .collect(),
            Self::Edit | Self::Manage => ApiScope::all(),
        }
    }

    pub fn is_full_access(&self) -> bool {
        matches!(self, Self::Manage)
    }
}

impl fmt::Display for PermissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "VIEW" => Ok(Self::View),
            "TRANSLATE" => Ok(Self::Translate),
            "EDIT" => Ok(Self::Edit),
            "MANAGE" => Ok(Self::Manage),
            other => Err(format!("Unknown permission type: {}", other)),
        }
    }
}

/// Permission key, one per (user, repository) pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionId(String);

impl PermissionId {
    pub fn for_pair(user_id: &UserId, repository_id: &RepositoryId) -> Self {
        Self(format!("{}.{}", user_id, repository_id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl StorageKey for PermissionId {
    fn as_str(&self) -> &str {
        &self.0
    }
}

/// A user's access level on a repository
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permission {
    id: PermissionId,
    user_id: UserId,
    repository_id: RepositoryId,
    permission_type: PermissionType,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl StorageEntity for Permission {
    type Key = PermissionId;
    const COLLECTION: &'static str = "permissions";

    fn key(&self) -> &Self::Key {
        &self.id
    }
}

impl Permission {
    pub fn new(user_id: UserId, repository_id: RepositoryId, permission_type: PermissionType) -> Self {
        let now = Utc::now();
        Self {
            id: PermissionId::for_pair(&user_id, &repository_id),
            user_id,
            repository_id,
            permission_type,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> &PermissionId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn repository_id(&self) -> &RepositoryId {
        &self.repository_id
    }

    pub fn permission_type(&self) -> PermissionType {
        self.permission_type
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn set_permission_type(&mut self, permission_type: PermissionType) {
        self.permission_type = permission_type;
        self.updated_at = Utc::now();
    }
}
