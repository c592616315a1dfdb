//! API Key infrastructure implementations
//!
//! Secret generation, the storage-backed repository and the key service.

mod generator;
mod service;
mod storage_repository;

pub use generator::{ApiKeyGenerator, GeneratedApiKey};
pub use service::ApiKeyService;
pub use storage_repository::StorageApiKeyRepository;
