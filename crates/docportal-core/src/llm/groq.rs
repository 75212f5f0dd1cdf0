//! Groq chat client (OpenAI-compatible chat completions API)

use super::http::{build_client, send_json, trim_base_url};
use super::loader::{ChatProviderFactory, ChatSettings};
use super::{ChatClient, ChatMessage};
use crate::config::{CredentialSet, GROQ_API_KEY};
use crate::error::{DocPortalError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const GROQ_PROVIDER: &str = "groq";
pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Groq chat completion client
///
/// Groq's endpoint is OpenAI-compatible. `max_output_tokens` from the config
/// is not forwarded; the service default applies.
pub struct GroqChatClient {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

impl GroqChatClient {
    pub fn new(settings: &ChatSettings, api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http_client: build_client(GROQ_PROVIDER, settings.timeout_secs)?,
            api_key: api_key.into(),
            base_url: trim_base_url(settings.base_url.as_deref().unwrap_or(GROQ_BASE_URL)),
            model: settings.model_name.clone(),
            temperature: settings.temperature,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn request_body<'a>(&'a self, messages: &'a [ChatMessage]) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
        }
    }

    fn first_choice(response: ChatResponse) -> Result<String> {
        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| DocPortalError::provider(GROQ_PROVIDER, "No response from LLM"))
    }
}

#[async_trait]
impl ChatClient for GroqChatClient {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let request = self
            .http_client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&self.request_body(&messages));

        let response: ChatResponse = send_json(GROQ_PROVIDER, request).await?;
        Self::first_choice(response)
    }

    fn provider(&self) -> &'static str {
        GROQ_PROVIDER
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn temperature(&self) -> f32 {
        self.temperature
    }

    fn max_output_tokens(&self) -> Option<u32> {
        None
    }
}

/// Builds [`GroqChatClient`] bound to `GROQ_API_KEY`
#[derive(Debug, Default)]
pub struct GroqChatFactory;

impl ChatProviderFactory for GroqChatFactory {
    fn provider(&self) -> &'static str {
        GROQ_PROVIDER
    }

    fn construct(
        &self,
        settings: &ChatSettings,
        credentials: &CredentialSet,
    ) -> Result<Arc<dyn ChatClient>> {
        let api_key = credentials.require(GROQ_API_KEY)?;
        Ok(Arc::new(GroqChatClient::new(settings, api_key)?))
    }
}
