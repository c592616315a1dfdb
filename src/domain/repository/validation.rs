//! Repository validation

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RepositoryValidationError {
    #[error("Repository ID cannot be empty")]
    EmptyId,

    #[error("Repository ID cannot exceed {0} characters")]
    IdTooLong(usize),

    #[error("Repository ID can only contain alphanumeric characters and hyphens")]
    InvalidIdCharacters,

    #[error("Repository name cannot be empty")]
    EmptyName,

    #[error("Repository name cannot exceed {0} characters")]
    NameTooLong(usize),
}

const MAX_REPOSITORY_ID_LENGTH: usize = 50;
const MAX_REPOSITORY_NAME_LENGTH: usize = 100;

pub fn validate_repository_id(id: &str) -> Result<(), RepositoryValidationError> {
    if id.is_empty() {
        return Err(RepositoryValidationError::EmptyId);
    }

    if id.len() > MAX_REPOSITORY_ID_LENGTH {
        return Err(RepositoryValidationError::IdTooLong(MAX_REPOSITORY_ID_LENGTH));
    }

    if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(RepositoryValidationError::InvalidIdCharacters);
    }

    Ok(())
}

pub fn validate_repository_name(name: &str) -> Result<(), RepositoryValidationError> {
    if name.trim().is_empty() {
        return Err(RepositoryValidationError::EmptyName);
    }

    if name.chars().count() > MAX_REPOSITORY_NAME_LENGTH {
        return Err(RepositoryValidationError::NameTooLong(MAX_REPOSITORY_NAME_LENGTH));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_ids() {
        assert!(validate_repository_id("repo-1").is_ok());
        assert_eq!(validate_repository_id(""), Err(RepositoryValidationError::EmptyId));
        assert_eq!(
            validate_repository_id("repo_1"),
            Err(RepositoryValidationError::InvalidIdCharacters)
        );
        assert_eq!(
            validate_repository_id(&"r".repeat(51)),
            Err(RepositoryValidationError::IdTooLong(50))
        );
    }

    #[test]
    fn test_repository_names() {
        assert!(validate_repository_name("Mobile app strings").is_ok());
        assert_eq!(
            validate_repository_name("   "),
            Err(RepositoryValidationError::EmptyName)
        );
        assert_eq!(
            validate_repository_name(&"n".repeat(101)),
            Err(RepositoryValidationError::NameTooLong(100))
        );
    }
}
