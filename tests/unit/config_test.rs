//! Unit tests for configuration module

use ping_service::config::Settings;
use std::io::Write;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_missing_file_uses_defaults() {
    let settings = Settings::load_from_path("does/not/exist.yaml").unwrap();

    assert_eq!(settings.server.port, 8000);
    assert_eq!(settings.api.prefix, "/api/v1");
    assert_eq!(settings.docs.openapi_path, "/openapi.json");
    assert_eq!(settings.chat.base_url, "http://localhost:8080/v1");
    assert_eq!(settings.chat.model, "qwen3-32b");
    assert!(settings.chat.api_key_env.is_none());
}

#[test]
fn test_yaml_file_overrides_defaults() {
    let file = write_config(
        r#"
server:
  port: 9100
api:
  prefix: "/api/v2"
  title: "Status API"
docs:
  enabled: false
chat:
  model: "llama3"
  api_key_env: "LOCAL_LLM_KEY"
"#,
    );

    let settings = Settings::load_from_path(file.path()).unwrap();

    assert_eq!(settings.server.port, 9100);
    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.api.prefix, "/api/v2");
    assert_eq!(settings.api.title, "Status API");
    assert_eq!(settings.api.version, "0.1.0");
    assert!(!settings.docs.enabled);
    assert_eq!(settings.chat.model, "llama3");
    assert_eq!(settings.chat.api_key_env.as_deref(), Some("LOCAL_LLM_KEY"));
    assert!(settings.validate().is_ok());
}

#[test]
fn test_environment_overrides_file() {
    let file = write_config(
        r#"
chat:
  system_prompt: "from file"
"#,
    );
    std::env::set_var("PING_SERVICE__CHAT__SYSTEM_PROMPT", "from env");

    let settings = Settings::load_from_path(file.path()).unwrap();
    std::env::remove_var("PING_SERVICE__CHAT__SYSTEM_PROMPT");

    assert_eq!(settings.chat.system_prompt, "from env");
}

#[test]
fn test_invalid_yaml_is_an_error() {
    let file = write_config("server: [unclosed");
    assert!(Settings::load_from_path(file.path()).is_err());
}

#[test]
fn test_settings_validation_invalid_port() {
    let mut settings = Settings::default();
    settings.server.port = 0;

    assert!(settings.validate().is_err());
}

#[test]
fn test_settings_validation_prefix_without_slash() {
    let mut settings = Settings::default();
    settings.api.prefix = "api/v1".to_string();

    assert!(settings.validate().is_err());
}

#[test]
fn test_settings_validation_relative_docs_path() {
    let mut settings = Settings::default();
    settings.docs.openapi_path = "openapi.json".to_string();

    assert!(settings.validate().is_err());
}

#[test]
fn test_settings_validation_empty_model() {
    let mut settings = Settings::default();
    settings.chat.model = "  ".to_string();

    assert!(settings.validate().is_err());
}

#[test]
fn test_settings_validation_docs_paths_collide() {
    let mut settings = Settings::default();
    settings.docs.swagger_path = "/docs".to_string();
    settings.docs.openapi_path = "/docs".to_string();
    assert!(settings.validate().is_err());

    settings.docs.openapi_path = "/docs/".to_string();
    assert!(settings.validate().is_err());
}

#[test]
fn test_settings_validation_openapi_under_swagger_allowed() {
    let mut settings = Settings::default();
    settings.docs.swagger_path = "/docs".to_string();
    settings.docs.openapi_path = "/docs/openapi.json".to_string();

    assert!(settings.validate().is_ok());
}
