//! User domain
//!
//! User accounts that own API keys and hold repository permissions.

mod entity;
mod repository;
mod validation;

pub use entity::{User, UserId};
pub use repository::UserRepository;
pub use validation::{validate_password, validate_user_id, validate_username, UserValidationError};
