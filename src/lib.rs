//! Ping Service
//!
//! A versioned HTTP API scaffold: route modules are mounted under a prefix with
//! documentation tags, composed into a single axum application and served by
//! the host. A companion `chat-probe` binary exercises a local
//! OpenAI-compatible chat-completion endpoint.

pub mod api;
pub mod chat;
pub mod config;
pub mod error;
pub mod server;
pub mod telemetry;

pub use error::{AppError, Result};
