//! Configuration module

pub mod settings;

pub use settings::{
    ApiConfig, ChatConfig, DocsConfig, LoggingConfig, ServerConfig, Settings, DEFAULT_CONFIG_PATH,
    ENV_PREFIX,
};
