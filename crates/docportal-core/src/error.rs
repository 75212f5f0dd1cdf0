//! Error types for docportal

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using DocPortalError
pub type Result<T> = std::result::Result<T, DocPortalError>;

/// Error type alias for convenience
pub type Error = DocPortalError;

/// Boxed underlying cause attached to domain errors
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Exit codes for CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const NOT_FOUND: i32 = 2;
    pub const INVALID_INPUT: i32 = 3;
}

/// Main error type for docportal
#[derive(Debug, Error)]
pub enum DocPortalError {
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingCredentials(Vec<String>),

    #[error("Unsupported LLM provider: {0}")]
    UnsupportedProvider(String),

    #[error("Failed to load model: {message}")]
    ModelLoad {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("Invalid file format: {0}. Only PDF files are allowed")]
    InvalidFormat(String),

    #[error("Failed to read PDF {}: {message}", .path.display())]
    Read {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("Storage error at {}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Provider error ({provider}): {message}")]
    Provider {
        provider: String,
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("Document analysis failed: {message}")]
    Analysis {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

impl DocPortalError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    pub fn config_with(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn model_load(message: impl Into<String>) -> Self {
        Self::ModelLoad {
            message: message.into(),
            source: None,
        }
    }

    pub fn model_load_with(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::ModelLoad {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn read(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Read {
            path: path.into(),
            message: message.into(),
            source: None,
        }
    }

    pub fn read_with(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Read {
            path: path.into(),
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
            source: None,
        }
    }

    pub fn provider_with(
        provider: impl Into<String>,
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn analysis(message: impl Into<String>) -> Self {
        Self::Analysis {
            message: message.into(),
            source: None,
        }
    }

    pub fn analysis_with(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Analysis {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Read { .. } => exit_codes::NOT_FOUND,
            Self::Config { .. }
            | Self::MissingCredentials(_)
            | Self::UnsupportedProvider(_)
            | Self::InvalidFormat(_) => exit_codes::INVALID_INPUT,
            _ => exit_codes::GENERAL_ERROR,
        }
    }
}
