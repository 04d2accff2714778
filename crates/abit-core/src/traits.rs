use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Text to dense vector. Build and query time must go through the same
/// implementation so that distances are comparable.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Identifier recorded in the persisted index
    fn model_id(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChatOptions {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            max_tokens: 1000,
        }
    }
}

/// Failure categories of a completion call. Callers match on the kind
/// instead of inspecting messages.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM authentication failed: {0}")]
    Authentication(String),

    #[error("LLM rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("LLM API error: {0}")]
    Api(String),
}

#[async_trait]
pub trait ModelProvider: Send + Sync {
    async fn chat(&self, messages: &[Message], options: ChatOptions) -> Result<String, LlmError>;

    /// Cheap authenticated request used once at startup
    async fn health_check(&self) -> Result<(), LlmError> {
        Ok(())
    }

    fn model(&self) -> &str;
}
