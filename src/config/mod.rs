//! Application configuration loading

mod app_config;

pub use app_config::{
    AgentConfig, AppConfig, AuthConfig, LogFormat, LoggingConfig, ServerConfig, StorageConfig,
};
