//! API key validation utilities

use thiserror::Error;

use super::scope::ScopeSet;
use crate::domain::DomainError;

/// Request field carrying the scope set
pub const SCOPES_FIELD: &str = "scopes";

/// Request field carrying the repository reference
pub const REPOSITORY_ID_FIELD: &str = "repositoryId";

pub const MUST_NOT_BE_EMPTY: &str = "must not be empty";

/// Errors that can occur during API key ID validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiKeyValidationError {
    #[error("API key ID cannot be empty")]
    EmptyId,

    #[error("API key ID exceeds maximum length of {0} characters")]
    TooLong(usize),

    #[error("API key ID must start and end with a letter or number")]
    InvalidBoundary,

    #[error("API key ID contains invalid character: '{0}'. Only alphanumeric characters and hyphens are allowed")]
    InvalidCharacter(char),
}

const MAX_API_KEY_ID_LENGTH: usize = 50;

/// Validate an API key ID
///
/// Generated IDs are UUIDs; the rules accept any short alphanumeric-and-hyphen
/// identifier so that IDs arriving over the wire are rejected early.
pub fn validate_api_key_id(id: &str) -> Result<(), ApiKeyValidationError> {
    if id.is_empty() {
        return Err(ApiKeyValidationError::EmptyId);
    }

    if id.len() > MAX_API_KEY_ID_LENGTH {
        return Err(ApiKeyValidationError::TooLong(MAX_API_KEY_ID_LENGTH));
    }

    if let Some(c) = id.chars().find(|c| !c.is_ascii_alphanumeric() && *c != '-') {
        return Err(ApiKeyValidationError::InvalidCharacter(c));
    }

    if id.starts_with('-') || id.ends_with('-') {
        return Err(ApiKeyValidationError::InvalidBoundary);
    }

    Ok(())
}

/// A key must always carry at least one scope
pub fn validate_scopes(scopes: &ScopeSet) -> Result<(), DomainError> {
    if scopes.is_empty() {
        return Err(DomainError::field(SCOPES_FIELD, MUST_NOT_BE_EMPTY));
    }

    Ok(())
}
