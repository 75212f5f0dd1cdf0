//! Google Generative AI clients (Gemini chat and text embeddings)

use super::http::{build_client, send_json, trim_base_url};
use super::loader::{ChatProviderFactory, ChatSettings, EmbeddingProviderFactory, EmbeddingSettings};
use super::{ChatClient, ChatMessage, EmbeddingClient};
use crate::config::{CredentialSet, GOOGLE_API_KEY};
use crate::error::{DocPortalError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const GOOGLE_PROVIDER: &str = "google";
pub const GOOGLE_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Model ids may be given as `gemini-2.0-flash` or `models/gemini-2.0-flash`
fn model_path(model: &str) -> String {
    if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{}", model)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<&str>, text: &str) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Gemini chat client
pub struct GoogleChatClient {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_output_tokens: u32,
}

impl GoogleChatClient {
    pub fn new(settings: &ChatSettings, api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http_client: build_client(GOOGLE_PROVIDER, settings.timeout_secs)?,
            api_key: api_key.into(),
            base_url: trim_base_url(settings.base_url.as_deref().unwrap_or(GOOGLE_BASE_URL)),
            model: settings.model_name.clone(),
            temperature: settings.temperature,
            max_output_tokens: settings.max_output_tokens,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, model_path(&self.model))
    }

    /// System messages become `systemInstruction`, assistant turns use role `model`
    fn request_body(&self, messages: &[ChatMessage]) -> GenerateRequest {
        let system: Vec<&str> = messages
            .iter()
            .filter(|m| m.role == ChatMessage::SYSTEM)
            .map(|m| m.content.as_str())
            .collect();

        let contents = messages
            .iter()
            .filter(|m| m.role != ChatMessage::SYSTEM)
            .map(|m| {
                let role = if m.role == ChatMessage::ASSISTANT {
                    "model"
                } else {
                    "user"
                };
                Content::text(Some(role), &m.content)
            })
            .collect();

        GenerateRequest {
            system_instruction: (!system.is_empty())
                .then(|| Content::text(None, &system.join("\n\n"))),
            contents,
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
            },
        }
    }

    fn candidate_text(response: GenerateResponse) -> Result<String> {
        let content = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .ok_or_else(|| DocPortalError::provider(GOOGLE_PROVIDER, "No response from LLM"))?;

        Ok(content
            .parts
            .into_iter()
            .map(|p| p.text)
            .collect::<Vec<_>>()
            .join(""))
    }
}

#[async_trait]
impl ChatClient for GoogleChatClient {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let request = self
            .http_client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&self.request_body(&messages));

        let response: GenerateResponse = send_json(GOOGLE_PROVIDER, request).await?;
        Self::candidate_text(response)
    }

    fn provider(&self) -> &'static str {
        GOOGLE_PROVIDER
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn temperature(&self) -> f32 {
        self.temperature
    }

    fn max_output_tokens(&self) -> Option<u32> {
        Some(self.max_output_tokens)
    }
}

/// Builds [`GoogleChatClient`] bound to `GOOGLE_API_KEY`
#[derive(Debug, Default)]
pub struct GoogleChatFactory;

impl ChatProviderFactory for GoogleChatFactory {
    fn provider(&self) -> &'static str {
        GOOGLE_PROVIDER
    }

    fn construct(
        &self,
        settings: &ChatSettings,
        credentials: &CredentialSet,
    ) -> Result<Arc<dyn ChatClient>> {
        let api_key = credentials.require(GOOGLE_API_KEY)?;
        Ok(Arc::new(GoogleChatClient::new(settings, api_key)?))
    }
}

#[derive(Debug, Serialize)]
struct EmbedRequest {
    model: String,
    content: Content,
}

#[derive(Debug, Serialize)]
struct BatchEmbedRequest {
    requests: Vec<EmbedRequest>,
}

#[derive(Debug, Deserialize)]
struct EmbedValues {
    values: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: EmbedValues,
}

#[derive(Debug, Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<EmbedValues>,
}

/// Google text-embedding client
pub struct GoogleEmbedder {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GoogleEmbedder {
    pub fn new(settings: &EmbeddingSettings, api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http_client: build_client(GOOGLE_PROVIDER, settings.timeout_secs)?,
            api_key: api_key.into(),
            base_url: trim_base_url(settings.base_url.as_deref().unwrap_or(GOOGLE_BASE_URL)),
            model: settings.model_name.clone(),
        })
    }

    fn embed_request(&self, text: &str) -> EmbedRequest {
        EmbedRequest {
            model: model_path(&self.model),
            content: Content::text(None, text),
        }
    }
}

#[async_trait]
impl EmbeddingClient for GoogleEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/{}:embedContent", self.base_url, model_path(&self.model));
        let request = self
            .http_client
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&self.embed_request(text));

        let response: EmbedResponse = send_json(GOOGLE_PROVIDER, request).await?;
        Ok(response.embedding.values)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!(
            "{}/{}:batchEmbedContents",
            self.base_url,
            model_path(&self.model)
        );
        let body = BatchEmbedRequest {
            requests: texts.iter().map(|t| self.embed_request(t)).collect(),
        };
        let request = self
            .http_client
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body);

        let response: BatchEmbedResponse = send_json(GOOGLE_PROVIDER, request).await?;
        if response.embeddings.len() != texts.len() {
            return Err(DocPortalError::provider(
                GOOGLE_PROVIDER,
                format!(
                    "expected {} embeddings, got {}",
                    texts.len(),
                    response.embeddings.len()
                ),
            ));
        }
        Ok(response.embeddings.into_iter().map(|e| e.values).collect())
    }

    fn provider(&self) -> &'static str {
        GOOGLE_PROVIDER
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Builds [`GoogleEmbedder`] bound to `GOOGLE_API_KEY`
#[derive(Debug, Default)]
pub struct GoogleEmbeddingFactory;

impl EmbeddingProviderFactory for GoogleEmbeddingFactory {
    fn provider(&self) -> &'static str {
        GOOGLE_PROVIDER
    }

    fn construct(
        &self,
        settings: &EmbeddingSettings,
        credentials: &CredentialSet,
    ) -> Result<Arc<dyn EmbeddingClient>> {
        let api_key = credentials.require(GOOGLE_API_KEY)?;
        Ok(Arc::new(GoogleEmbedder::new(settings, api_key)?))
    }
}
