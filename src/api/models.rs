//! API request and response models

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health check acknowledgment
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct PingResponse {
    /// Always `"pong"`
    #[schema(example = "pong")]
    pub message: String,
}

impl PingResponse {
    pub fn pong() -> Self {
        Self {
            message: "pong".to_string(),
        }
    }
}
