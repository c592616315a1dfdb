//! User infrastructure module
//!
//! Argon2 password hashing, the storage-backed repository and the user service.

mod password;
mod service;
mod storage_repository;

pub use password::{Argon2Hasher, PasswordHasher};
pub use service::{CreateUserRequest, UserService};
pub use storage_repository::StorageUserRepository;
