//! Document analysis
//!
//! Provides:
//! - The metadata schema returned by the model
//! - Prompt templating
//! - Strict and self-repairing output parsers
//! - [`DocumentAnalyzer`], tying them to a chat client

mod analyzer;
mod metadata;
mod parser;
mod prompt;

pub use analyzer::DocumentAnalyzer;
pub use metadata::{format_instructions, Metadata, PageCount, METADATA_SCHEMA};
pub use parser::{extract_json, JsonOutputParser, OutputFixingParser, OutputParser};
pub use prompt::{PromptTemplate, DOCUMENT_ANALYSIS_PROMPT};
