//! Translation repository domain
//!
//! Repositories group translations; API keys and permissions are bound to one.

mod entity;
mod store;
mod validation;

pub use entity::{Repository, RepositoryId};
pub use store::RepositoryStore;
pub use validation::{validate_repository_id, validate_repository_name, RepositoryValidationError};
