//! Permission infrastructure module

mod service;
mod storage_repository;

pub use service::PermissionService;
pub use storage_repository::StoragePermissionRepository;
