//! Application settings and configuration management

use crate::error::{AppError, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default location of the service configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/service.yaml";

/// Environment variable prefix, e.g. `PING_SERVICE__SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "PING_SERVICE";

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub api: ApiConfig,
    pub docs: DocsConfig,
    pub logging: LoggingConfig,
    pub chat: ChatConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_request_timeout() -> u64 {
    30
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Versioned API metadata and mount point
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_prefix() -> String {
    "/api/v1".to_string()
}

fn default_title() -> String {
    "Ping Service".to_string()
}

fn default_version() -> String {
    "0.1.0".to_string()
}

/// API documentation endpoints
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DocsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_swagger_path")]
    pub swagger_path: String,
    #[serde(default = "default_openapi_path")]
    pub openapi_path: String,
}

fn default_true() -> bool {
    true
}

fn default_swagger_path() -> String {
    "/docs".to_string()
}

fn default_openapi_path() -> String {
    "/openapi.json".to_string()
}

impl DocsConfig {
    /// The OpenAPI document cannot share a route with the Swagger UI,
    /// which serves `<swagger_path>` and `<swagger_path>/`
    pub fn check_distinct(&self) -> Result<()> {
        let swagger = self.swagger_path.trim_end_matches('/');
        let openapi = self.openapi_path.trim_end_matches('/');

        if openapi == swagger {
            return Err(invalid(format!(
                "Docs paths '{}' and '{}' collide",
                self.swagger_path, self.openapi_path
            )));
        }

        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

/// OpenAI-compatible chat endpoint used by the `chat-probe` binary
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatConfig {
    #[serde(default = "default_chat_base_url")]
    pub base_url: String,
    #[serde(default = "default_chat_model")]
    pub model: String,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    #[serde(default = "default_chat_timeout")]
    pub timeout_ms: u64,
    /// Name of the environment variable holding a bearer token
    #[serde(default)]
    pub api_key_env: Option<String>,
}

fn default_chat_base_url() -> String {
    "http://localhost:8080/v1".to_string()
}

fn default_chat_model() -> String {
    "qwen3-32b".to_string()
}

fn default_system_prompt() -> String {
    "You are a helpful assistant.".to_string()
}

fn default_chat_timeout() -> u64 {
    120_000
}

impl Settings {
    /// Load settings from the default configuration file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(DEFAULT_CONFIG_PATH)
    }

    /// Load settings from a specific YAML (or TOML) file, overlaid with environment variables.
    /// A missing file is not an error; defaults apply.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let format = if path.extension().map_or(false, |ext| ext == "toml") {
            FileFormat::Toml
        } else {
            FileFormat::Yaml
        };

        let mut builder = Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", i64::from(default_port()))?
            .set_default("server.request_timeout_secs", default_request_timeout() as i64)?
            .set_default("api.prefix", default_prefix())?
            .set_default("api.title", default_title())?
            .set_default("api.version", default_version())?
            .set_default("docs.enabled", true)?
            .set_default("docs.swagger_path", default_swagger_path())?
            .set_default("docs.openapi_path", default_openapi_path())?
            .set_default("logging.level", default_log_level())?
            .set_default("logging.format", default_log_format())?
            .set_default("chat.base_url", default_chat_base_url())?
            .set_default("chat.model", default_chat_model())?
            .set_default("chat.system_prompt", default_system_prompt())?
            .set_default("chat.timeout_ms", default_chat_timeout() as i64)?;

        if path.exists() {
            builder = builder.add_source(File::from(path).format(format));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let settings: Settings = builder.build()?.try_deserialize()?;
        Ok(settings)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(invalid("Server port cannot be 0"));
        }

        if !self.api.prefix.is_empty() && !self.api.prefix.starts_with('/') {
            return Err(invalid(format!(
                "API prefix '{}' must be empty or start with '/'",
                self.api.prefix
            )));
        }

        for path in [&self.docs.swagger_path, &self.docs.openapi_path] {
            if !path.starts_with('/') {
                return Err(invalid(format!("Docs path '{}' must start with '/'", path)));
            }
        }

        self.docs.check_distinct()?;

        if self.chat.model.trim().is_empty() {
            return Err(invalid("Chat model cannot be empty"));
        }

        reqwest::Url::parse(&self.chat.base_url).map_err(|e| {
            invalid(format!("Invalid chat base URL '{}': {}", self.chat.base_url, e))
        })?;

        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> AppError {
    AppError::Config(config::ConfigError::Message(message.into()))
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
                request_timeout_secs: default_request_timeout(),
            },
            api: ApiConfig {
                prefix: default_prefix(),
                title: default_title(),
                version: default_version(),
                description: None,
            },
            docs: DocsConfig {
                enabled: true,
                swagger_path: default_swagger_path(),
                openapi_path: default_openapi_path(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
                format: default_log_format(),
            },
            chat: ChatConfig {
                base_url: default_chat_base_url(),
                model: default_chat_model(),
                system_prompt: default_system_prompt(),
                timeout_ms: default_chat_timeout(),
                api_key_env: None,
            },
        }
    }
}
