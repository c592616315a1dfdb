//! API Key domain
//!
//! This module provides domain types and traits for API key management:
//! keys bound to one owner and one repository, carrying a non-empty scope set.

mod entity;
mod repository;
mod scope;
mod validation;

pub use entity::{ApiKey, ApiKeyId};
pub use repository::ApiKeyRepository;
pub use scope::{ApiScope, ScopeSet};
pub use validation::{
    validate_api_key_id, validate_scopes, ApiKeyValidationError, MUST_NOT_BE_EMPTY,
    REPOSITORY_ID_FIELD, SCOPES_FIELD,
};
