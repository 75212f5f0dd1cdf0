//! LLM integration
//!
//! Provides traits and implementations for:
//! - Chat completion (Groq, Google Gemini)
//! - Embedding generation (HuggingFace inference, Google)
//! - Configuration-driven client construction

mod http;
mod traits;

pub mod google;
pub mod groq;
pub mod huggingface;
pub mod loader;

pub use google::{GoogleChatClient, GoogleEmbedder};
pub use groq::GroqChatClient;
pub use huggingface::HuggingFaceEmbedder;
pub use loader::{
    ChatProviderFactory, ChatProviderRegistry, ChatSettings, EmbeddingProviderFactory,
    EmbeddingProviderRegistry, EmbeddingSettings, ModelLoader, DEFAULT_PROVIDER_KEY,
    LLM_PROVIDER_ENV,
};
pub use traits::*;
