use serde::Deserialize;

use crate::infrastructure::storage::{PostgresConfig, StorageConfig, StorageType};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub storage: StorageSettings,
    pub auth: AuthConfig,
    pub api_keys: ApiKeysConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Storage backend selection
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// `memory` or `postgres`
    pub backend: String,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_hours: u64,
    /// Account created at startup when no user with this name exists
    pub initial_username: Option<String>,
    pub initial_password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiKeysConfig {
    /// Prepended to every generated secret
    pub prefix: String,
    /// Random bytes per secret
    pub key_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            database_url: None,
            max_connections: 10,
            min_connections: 1,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_hours: 24,
            initial_username: None,
            initial_password: None,
        }
    }
}

impl Default for ApiKeysConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            key_bytes: 32,
        }
    }
}

impl StorageSettings {
    /// Resolve the configured backend into a storage configuration
    pub fn to_storage_config(&self) -> Result<StorageConfig, String> {
        match self.backend.parse::<StorageType>()? {
            StorageType::InMemory => Ok(StorageConfig::InMemory),
            StorageType::Postgres => {
                let url = self
                    .database_url
                    .as_deref()
                    .ok_or("storage.database_url is required for the postgres backend")?;

                Ok(StorageConfig::Postgres(
                    PostgresConfig::new(url)
                        .with_max_connections(self.max_connections)
                        .with_min_connections(self.min_connections),
                ))
            }
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
