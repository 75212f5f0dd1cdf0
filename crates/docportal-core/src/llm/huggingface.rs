//! HuggingFace inference embedder (feature-extraction pipeline)

use super::http::{build_client, send_json, trim_base_url};
use super::loader::{EmbeddingProviderFactory, EmbeddingSettings};
use super::EmbeddingClient;
use crate::config::{CredentialSet, HF_TOKEN};
use crate::error::{DocPortalError, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

pub const HUGGINGFACE_PROVIDER: &str = "huggingface";
pub const HUGGINGFACE_BASE_URL: &str = "https://router.huggingface.co/hf-inference";

#[derive(Debug, Serialize)]
struct FeatureExtractionRequest<'a> {
    inputs: &'a [String],
}

/// Embedder backed by a sentence-transformers model on HuggingFace inference
pub struct HuggingFaceEmbedder {
    http_client: reqwest::Client,
    token: String,
    base_url: String,
    model: String,
}

impl HuggingFaceEmbedder {
    pub fn new(settings: &EmbeddingSettings, token: impl Into<String>) -> Result<Self> {
        let model = settings.model_name.trim();
        // Hub ids are `name` or `org/name`
        if model.is_empty() || model.split('/').count() > 2 || model.contains(char::is_whitespace)
        {
            return Err(DocPortalError::model_load(format!(
                "Invalid HuggingFace model identifier: '{}'",
                settings.model_name
            )));
        }

        Ok(Self {
            http_client: build_client(HUGGINGFACE_PROVIDER, settings.timeout_secs)?,
            token: token.into(),
            base_url: trim_base_url(
                settings
                    .base_url
                    .as_deref()
                    .unwrap_or(HUGGINGFACE_BASE_URL),
            ),
            model: model.to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}/pipeline/feature-extraction",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl EmbeddingClient for HuggingFaceEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let results = self.embed_batch(&[text.to_string()]).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| DocPortalError::provider(HUGGINGFACE_PROVIDER, "No embedding returned"))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = self
            .http_client
            .post(self.endpoint())
            .bearer_auth(&self.token)
            .json(&FeatureExtractionRequest { inputs: texts });

        let embeddings: Vec<Vec<f32>> = send_json(HUGGINGFACE_PROVIDER, request).await?;
        if embeddings.len() != texts.len() {
            return Err(DocPortalError::provider(
                HUGGINGFACE_PROVIDER,
                format!(
                    "expected {} embeddings, got {}",
                    texts.len(),
                    embeddings.len()
                ),
            ));
        }

        Ok(embeddings)
    }

    fn provider(&self) -> &'static str {
        HUGGINGFACE_PROVIDER
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Builds [`HuggingFaceEmbedder`] bound to `HF_TOKEN`
#[derive(Debug, Default)]
pub struct HuggingFaceEmbeddingFactory;

impl EmbeddingProviderFactory for HuggingFaceEmbeddingFactory {
    fn provider(&self) -> &'static str {
        HUGGINGFACE_PROVIDER
    }

    fn construct(
        &self,
        settings: &EmbeddingSettings,
        credentials: &CredentialSet,
    ) -> Result<Arc<dyn EmbeddingClient>> {
        let token = credentials.require(HF_TOKEN)?;
        Ok(Arc::new(HuggingFaceEmbedder::new(settings, token)?))
    }
}
