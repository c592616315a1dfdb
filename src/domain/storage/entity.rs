//! Storage entity traits

use std::fmt::Debug;

use serde::{de::DeserializeOwned, Serialize};

/// Trait for types that can be used as storage keys
pub trait StorageKey: Clone + Debug + Send + Sync + Eq + std::hash::Hash {
    /// Returns the key as a string for storage backends that require string keys
    fn as_str(&self) -> &str;
}

/// Trait for types that can be stored
///
/// Entities are persisted as JSON documents, so any field that should be
/// usable with [`Storage::find_by`](super::Storage::find_by) must serialize
/// to a JSON string.
pub trait StorageEntity: Clone + Debug + Send + Sync + Serialize + DeserializeOwned {
    /// The key type for this entity
    type Key: StorageKey;

    /// Collection (table) name used by persistent backends
    const COLLECTION: &'static str;

    /// Returns the entity's key
    fn key(&self) -> &Self::Key;

    /// Returns the string value of a top-level JSON field, if present
    fn field_value(&self, field: &str) -> Option<String> {
        serde_json::to_value(self)
            .ok()?
            .get(field)?
            .as_str()
            .map(str::to_string)
    }
}
