//! Model loading
//!
//! [`ModelLoader`] turns the static configuration and the validated
//! credentials into chat and embedding clients. Construction logic lives in
//! provider factories registered by name, so adding a provider means adding
//! one factory and registering it:
//!
//! ```ignore
//! let loader = ModelLoader::new(config, credentials)
//!     .with_chat_provider(Arc::new(MyProviderFactory));
//! ```

use super::google::{GoogleChatFactory, GoogleEmbeddingFactory};
use super::groq::GroqChatFactory;
use super::huggingface::HuggingFaceEmbeddingFactory;
use super::{ChatClient, EmbeddingClient};
use crate::config::{Config, CredentialSet, LlmProviderConfig, REQUIRED_CREDENTIALS};
use crate::error::{DocPortalError, Result};
use crate::logging::{SharedSink, TracingSink};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Environment variable selecting the active `llm` entry
pub const LLM_PROVIDER_ENV: &str = "LLM_PROVIDER";

/// Provider key used when `LLM_PROVIDER` is unset
pub const DEFAULT_PROVIDER_KEY: &str = "groq";

/// Chat model settings with defaults applied
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSettings {
    pub model_name: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub timeout_secs: Option<u64>,
    pub base_url: Option<String>,
}

/// Embedding model settings
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingSettings {
    pub model_name: String,
    pub timeout_secs: Option<u64>,
    pub base_url: Option<String>,
}

/// Constructs a chat client for one provider value
pub trait ChatProviderFactory: Send + Sync {
    /// Value of the `provider` field this factory handles
    fn provider(&self) -> &'static str;

    fn construct(
        &self,
        settings: &ChatSettings,
        credentials: &CredentialSet,
    ) -> Result<Arc<dyn ChatClient>>;
}

/// Constructs an embedding client for one provider value
pub trait EmbeddingProviderFactory: Send + Sync {
    fn provider(&self) -> &'static str;

    fn construct(
        &self,
        settings: &EmbeddingSettings,
        credentials: &CredentialSet,
    ) -> Result<Arc<dyn EmbeddingClient>>;
}

/// Registry of chat provider factories
pub struct ChatProviderRegistry {
    factories: HashMap<String, Arc<dyn ChatProviderFactory>>,
}

impl ChatProviderRegistry {
    /// Create new empty registry
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Create registry with the built-in providers
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(GroqChatFactory));
        registry.register(Arc::new(GoogleChatFactory));
        registry
    }

    /// Register a factory, replacing any previous one for the same provider
    pub fn register(&mut self, factory: Arc<dyn ChatProviderFactory>) {
        self.factories
            .insert(factory.provider().to_string(), factory);
    }

    pub fn get(&self, provider: &str) -> Option<Arc<dyn ChatProviderFactory>> {
        self.factories.get(provider).cloned()
    }

    /// Registered provider names, sorted
    pub fn providers(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for ChatProviderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Registry of embedding provider factories
pub struct EmbeddingProviderRegistry {
    factories: HashMap<String, Arc<dyn EmbeddingProviderFactory>>,
}

impl EmbeddingProviderRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(HuggingFaceEmbeddingFactory));
        registry.register(Arc::new(GoogleEmbeddingFactory));
        registry
    }

    pub fn register(&mut self, factory: Arc<dyn EmbeddingProviderFactory>) {
        self.factories
            .insert(factory.provider().to_string(), factory);
    }

    pub fn get(&self, provider: &str) -> Option<Arc<dyn EmbeddingProviderFactory>> {
        self.factories.get(provider).cloned()
    }
}

impl Default for EmbeddingProviderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Builds chat and embedding clients from configuration
pub struct ModelLoader {
    config: Arc<Config>,
    credentials: Arc<CredentialSet>,
    provider_key: String,
    chat_providers: ChatProviderRegistry,
    embedding_providers: EmbeddingProviderRegistry,
    log: SharedSink,
}

impl ModelLoader {
    /// Create a loader over already-validated inputs
    pub fn new(config: Config, credentials: CredentialSet) -> Self {
        Self {
            config: Arc::new(config),
            credentials: Arc::new(credentials),
            provider_key: DEFAULT_PROVIDER_KEY.to_string(),
            chat_providers: ChatProviderRegistry::with_defaults(),
            embedding_providers: EmbeddingProviderRegistry::with_defaults(),
            log: TracingSink::shared(),
        }
    }

    /// Full startup: `.env`, credential validation, config file, `LLM_PROVIDER`
    pub fn from_env(config_path: Option<&Path>, log: SharedSink) -> Result<Self> {
        dotenvy::dotenv().ok();

        let credentials = CredentialSet::validate(&REQUIRED_CREDENTIALS).map_err(|e| {
            if let DocPortalError::MissingCredentials(ref missing) = e {
                log.error(
                    "Missing required environment variables",
                    &[("missing_vars", missing.join(","))],
                );
            }
            e
        })?;
        log.info(
            "Environment variables validated successfully",
            &[("available_keys", credentials.keys().collect::<Vec<_>>().join(","))],
        );

        let config = Config::load(config_path).map_err(|e| {
            log.error("Failed to load configuration", &[("error", e.to_string())]);
            e
        })?;
        log.info(
            "configuration loaded successfully",
            &[("config_keys", config.section_keys().join(","))],
        );

        let provider_key = std::env::var(LLM_PROVIDER_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PROVIDER_KEY.to_string());

        Ok(Self::new(config, credentials)
            .with_provider_key(provider_key)
            .with_log_sink(log))
    }

    /// Select the `llm` entry used by [`ModelLoader::load_llm`]
    pub fn with_provider_key(mut self, key: impl Into<String>) -> Self {
        self.provider_key = key.into();
        self
    }

    pub fn with_log_sink(mut self, log: SharedSink) -> Self {
        self.log = log;
        self
    }

    /// Register an additional chat provider
    pub fn with_chat_provider(mut self, factory: Arc<dyn ChatProviderFactory>) -> Self {
        self.chat_providers.register(factory);
        self
    }

    /// Register an additional embedding provider
    pub fn with_embedding_provider(mut self, factory: Arc<dyn EmbeddingProviderFactory>) -> Self {
        self.embedding_providers.register(factory);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn credentials(&self) -> &CredentialSet {
        &self.credentials
    }

    pub fn provider_key(&self) -> &str {
        &self.provider_key
    }

    pub fn log_sink(&self) -> SharedSink {
        Arc::clone(&self.log)
    }

    /// Construct the configured embedding client
    pub fn load_embeddings(&self) -> Result<Arc<dyn EmbeddingClient>> {
        let section = &self.config.embedding_model;
        let model_name = section
            .model_name
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .ok_or_else(|| {
                self.log.error(
                    "Error loading embedding model",
                    &[("error", "embedding_model.model_name is not set".to_string())],
                );
                DocPortalError::model_load("embedding_model.model_name is not set")
            })?;

        let provider = section.provider_or_default();
        self.log.info(
            "Loading embedding model",
            &[
                ("provider", provider.to_string()),
                ("model", model_name.to_string()),
            ],
        );

        let factory = self.embedding_providers.get(provider).ok_or_else(|| {
            self.log.error(
                "Unsupported embedding provider",
                &[("provider", provider.to_string())],
            );
            DocPortalError::UnsupportedProvider(provider.to_string())
        })?;

        let settings = EmbeddingSettings {
            model_name: model_name.to_string(),
            timeout_secs: section.timeout_secs,
            base_url: section.base_url.clone(),
        };

        factory
            .construct(&settings, &self.credentials)
            .map_err(|e| {
                self.log.error(
                    "Error loading embedding model",
                    &[("model", model_name.to_string()), ("error", e.to_string())],
                );
                match e {
                    DocPortalError::ModelLoad { .. } => e,
                    other => DocPortalError::model_load_with(
                        format!("Failed to load embedding model '{}'", model_name),
                        other,
                    ),
                }
            })
    }

    /// Construct the chat client for the active provider key
    pub fn load_llm(&self) -> Result<Arc<dyn ChatClient>> {
        let key = self.provider_key.as_str();
        let entry = self.config.provider(key).ok_or_else(|| {
            self.log
                .error("LLM provider not found in config", &[("provider", key.to_string())]);
            DocPortalError::UnsupportedProvider(key.to_string())
        })?;

        let provider = entry
            .provider
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                self.log
                    .error("LLM provider field missing", &[("provider_key", key.to_string())]);
                DocPortalError::UnsupportedProvider(format!("<unset> (llm.{})", key))
            })?;

        let settings = Self::chat_settings(key, entry).map_err(|e| {
            self.log.error(
                "Invalid LLM configuration",
                &[("provider_key", key.to_string()), ("error", e.to_string())],
            );
            e
        })?;

        self.log.info(
            "Loading LLM",
            &[
                ("provider", provider.to_string()),
                ("model", settings.model_name.clone()),
            ],
        );

        let factory = self.chat_providers.get(provider).ok_or_else(|| {
            self.log
                .error("Unsupported LLM provider", &[("provider", provider.to_string())]);
            DocPortalError::UnsupportedProvider(provider.to_string())
        })?;

        factory.construct(&settings, &self.credentials).map_err(|e| {
            self.log.error(
                "Error loading LLM",
                &[("provider", provider.to_string()), ("error", e.to_string())],
            );
            e
        })
    }

    fn chat_settings(key: &str, entry: &LlmProviderConfig) -> Result<ChatSettings> {
        let model_name = entry
            .model_name
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .ok_or_else(|| DocPortalError::model_load(format!("llm.{}.model_name is not set", key)))?;

        Ok(ChatSettings {
            model_name: model_name.to_string(),
            temperature: entry.temperature_or_default(),
            max_output_tokens: entry.max_output_tokens_or_default(),
            timeout_secs: entry.timeout_secs,
            base_url: entry.base_url.clone(),
        })
    }
}
