//! DocPortal Core Library
//!
//! Core functionality for the docportal document analysis service.
//!
//! # Features
//! - YAML configuration with credential validation
//! - Chat model loading for Groq and Google Gemini, embeddings via HuggingFace
//! - Session-scoped PDF storage with page-tagged text extraction
//! - LLM-powered metadata extraction with output repair

pub mod analysis;
pub mod config;
pub mod document;
pub mod error;
pub mod llm;
pub mod logging;

pub use analysis::{DocumentAnalyzer, Metadata, PageCount, PromptTemplate};
pub use config::{Config, CredentialSet, EmbeddingModelConfig, LlmProviderConfig};
pub use document::{DocumentHandler, UploadedFile};
pub use error::{DocPortalError, Error, Result};
pub use llm::{
    ChatClient, ChatMessage, ChatProviderFactory, EmbeddingClient, EmbeddingProviderFactory,
    ModelLoader,
};
pub use logging::{LogSink, MemorySink, NullSink, SharedSink, TracingSink};
