//! Repository permission domain

mod entity;
mod repository;

pub use entity::{Permission, PermissionId, PermissionType};
#[cfg(test)]
pub use repository::MockPermissionChecker;
pub use repository::{PermissionChecker, PermissionRepository};
