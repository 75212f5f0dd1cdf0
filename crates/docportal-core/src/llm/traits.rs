//! LLM trait definitions

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Chat message for completion requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub const SYSTEM: &'static str = "system";
    pub const USER: &'static str = "user";
    pub const ASSISTANT: &'static str = "assistant";

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Self::SYSTEM.to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Self::USER.to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Self::ASSISTANT.to_string(),
            content: content.into(),
        }
    }
}

/// Chat completion capability
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Generate a completion for the conversation
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String>;

    /// Single-turn convenience over [`ChatClient::complete`]
    async fn invoke(&self, prompt: &str) -> Result<String> {
        self.complete(vec![ChatMessage::user(prompt)]).await
    }

    /// Provider identifier (`groq`, `google`)
    fn provider(&self) -> &'static str;

    /// Get model name
    fn model_name(&self) -> &str;

    fn temperature(&self) -> f32;

    /// Output token cap forwarded to the provider, if any
    fn max_output_tokens(&self) -> Option<u32>;
}

/// Embedding generation capability
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    /// Generate embedding for single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for batch of texts
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Provider identifier (`huggingface`, `google`)
    fn provider(&self) -> &'static str;

    /// Get model name
    fn model_name(&self) -> &str;
}
