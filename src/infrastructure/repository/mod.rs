//! Translation repository infrastructure

mod service;
mod storage_store;

pub use service::RepositoryService;
pub use storage_store::StorageRepositoryStore;
