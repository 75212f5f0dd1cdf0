//! Configuration management

pub mod credentials;

use crate::error::{DocPortalError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub use credentials::{CredentialSet, GOOGLE_API_KEY, GROQ_API_KEY, HF_TOKEN, REQUIRED_CREDENTIALS};

/// Environment variable overriding the config file location
pub const CONFIG_PATH_ENV: &str = "DOCPORTAL_CONFIG";

/// Config file location used when nothing else is given
pub const DEFAULT_CONFIG_PATH: &str = "config/config.yaml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Chat model settings keyed by provider key (the value of `LLM_PROVIDER`)
    #[serde(default)]
    pub llm: BTreeMap<String, LlmProviderConfig>,

    /// Embedding model settings
    #[serde(default)]
    pub embedding_model: EmbeddingModelConfig,
}

/// One entry of the `llm` section
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct LlmProviderConfig {
    /// Construction logic to use (`groq`, `google`)
    #[serde(default)]
    pub provider: Option<String>,

    #[serde(default)]
    pub model_name: Option<String>,

    #[serde(default)]
    pub temperature: Option<f32>,

    #[serde(default)]
    pub max_output_tokens: Option<u32>,

    /// Request timeout; the HTTP client's default applies when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Alternative API endpoint (compatible gateways, local test servers)
    #[serde(default)]
    pub base_url: Option<String>,
}

impl LlmProviderConfig {
    pub const DEFAULT_TEMPERATURE: f32 = 0.2;
    pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 2048;

    pub fn temperature_or_default(&self) -> f32 {
        self.temperature.unwrap_or(Self::DEFAULT_TEMPERATURE)
    }

    pub fn max_output_tokens_or_default(&self) -> u32 {
        self.max_output_tokens
            .unwrap_or(Self::DEFAULT_MAX_OUTPUT_TOKENS)
    }
}

/// The `embedding_model` section
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct EmbeddingModelConfig {
    #[serde(default)]
    pub model_name: Option<String>,

    /// Embedding vendor, `huggingface` when omitted
    #[serde(default)]
    pub provider: Option<String>,

    #[serde(default)]
    pub timeout_secs: Option<u64>,

    #[serde(default)]
    pub base_url: Option<String>,
}

impl EmbeddingModelConfig {
    pub const DEFAULT_PROVIDER: &'static str = "huggingface";

    pub fn provider_or_default(&self) -> &str {
        self.provider.as_deref().unwrap_or(Self::DEFAULT_PROVIDER)
    }
}

impl Config {
    /// Load config from `path`, or from the default location
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_path);

        if !path.is_file() {
            return Err(DocPortalError::config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(&path).map_err(|e| {
            DocPortalError::config_with(format!("Failed to read {}", path.display()), e)
        })?;

        serde_yaml::from_str(&content).map_err(|e| {
            DocPortalError::config_with(format!("Failed to parse {}", path.display()), e)
        })
    }

    /// Parse config from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| DocPortalError::config_with("Failed to parse configuration", e))
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Settings for a provider key under `llm`
    pub fn provider(&self, key: &str) -> Option<&LlmProviderConfig> {
        self.llm.get(key)
    }

    /// Top-level sections present in this config, for startup logging
    pub fn section_keys(&self) -> Vec<&'static str> {
        let mut keys = Vec::new();
        if !self.llm.is_empty() {
            keys.push("llm");
        }
        if self.embedding_model.model_name.is_some() {
            keys.push("embedding_model");
        }
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
embedding_model:
  provider: "huggingface"
  model_name: "sentence-transformers/all-MiniLM-L6-v2"

llm:
  groq:
    provider: "groq"
    model_name: "deepseek-r1-distill-llama-70b"
    temperature: 0
    max_output_tokens: 2048

  google:
    provider: "google"
    model_name: "gemini-2.0-flash"
    temperature: 0.5
"#;

    #[test]
    fn test_parse_sample() {
        let config = Config::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(config.llm.len(), 2);

        let groq = config.provider("groq").unwrap();
        assert_eq!(groq.provider.as_deref(), Some("groq"));
        assert_eq!(groq.temperature, Some(0.0));

        let google = config.provider("google").unwrap();
        assert_eq!(google.max_output_tokens, None);
        assert_eq!(google.max_output_tokens_or_default(), 2048);
        assert_eq!(
            config.embedding_model.model_name.as_deref(),
            Some("sentence-transformers/all-MiniLM-L6-v2")
        );
        assert_eq!(config.section_keys(), vec!["llm", "embedding_model"]);
    }

    #[test]
    fn test_defaults() {
        let entry = LlmProviderConfig::default();
        assert_eq!(entry.temperature_or_default(), 0.2);
        assert_eq!(
            EmbeddingModelConfig::default().provider_or_default(),
            "huggingface"
        );
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, SAMPLE).unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert!(config.provider("groq").is_some());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.yaml"))).unwrap_err();
        assert!(matches!(err, DocPortalError::Config { .. }));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "llm: [unclosed").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, DocPortalError::Config { source: Some(_), .. }));
    }
}
