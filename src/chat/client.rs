//! HTTP client for an OpenAI-compatible `chat.completions` endpoint

use std::time::Duration;

use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client,
};
use tracing::{debug, error};

use crate::chat::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::config::ChatConfig;
use crate::error::{AppError, Result};

/// Client for a single chat-completion service
pub struct ChatClient {
    client: Client,
    base_url: String,
    model: String,
    auth_token: Option<String>,
}

impl ChatClient {
    pub fn new(config: &ChatConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        // Local servers usually need no key
        let auth_token = config
            .api_key_env
            .as_ref()
            .and_then(|name| std::env::var(name).ok())
            .filter(|token| !token.is_empty());

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            auth_token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = &self.auth_token {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                headers.insert(AUTHORIZATION, value);
            }
        }

        headers
    }

    /// POST `<base_url>/chat/completions`
    pub async fn create(&self, request: &ChatCompletionRequest) -> Result<ChatCompletionResponse> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!(url = %url, model = %request.model, messages = request.messages.len(), "Sending chat completion request");

        let response = self
            .client
            .post(&url)
            .headers(self.headers())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "Chat endpoint returned {}: {}",
                status, body
            )));
        }

        response.json::<ChatCompletionResponse>().await.map_err(|e| {
            error!(error = %e, "Failed to parse chat completion response");
            AppError::Upstream(format!("Failed to parse response: {}", e))
        })
    }

    /// Send a system prompt and one user message, returning the first choice's content.
    /// `None` when the server answered with a `null` content.
    pub async fn ask(&self, system_prompt: &str, prompt: &str) -> Result<Option<String>> {
        let request = ChatCompletionRequest::new(
            self.model.clone(),
            vec![ChatMessage::system(system_prompt), ChatMessage::user(prompt)],
        );

        let response = self.create(&request).await?;
        if let Some(usage) = &response.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Chat completion usage"
            );
        }

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AppError::Upstream("Chat completion returned no choices".to_string()))
    }
}
