mod app_config;

pub use app_config::{
    ApiKeysConfig, AppConfig, AuthConfig, LogFormat, LoggingConfig, ServerConfig, StorageSettings,
};
