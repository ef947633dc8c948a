//! OpenAI-compatible chat completion client used by the `chat-probe` binary

pub mod client;
pub mod types;

pub use client::ChatClient;
pub use types::{ChatChoice, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Usage};
