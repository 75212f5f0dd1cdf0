//! Output parsers turning model completions into [`Metadata`]

use super::metadata::{format_instructions, Metadata};
use super::prompt::PromptTemplate;
use crate::error::{DocPortalError, Result};
use crate::llm::ChatClient;
use crate::logging::{SharedSink, TracingSink};
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;

lazy_static! {
    static ref THINK_BLOCK: Regex =
        Regex::new(r"(?s)<think>.*?</think>").expect("valid think regex");
    static ref FENCED_JSON: Regex =
        Regex::new(r"(?s)```(?:json)?\s*(.*?)```").expect("valid fence regex");
}

const FIX_PROMPT: &str = "Instructions:
--------------
{instructions}
--------------
Completion:
--------------
{completion}
--------------

Above, the Completion did not satisfy the constraints given in the Instructions.
Error:
--------------
{error}
--------------

Please try again. Please only respond with an answer that satisfies the constraints laid out in the Instructions:";

/// Parses a completion into [`Metadata`]
#[async_trait]
pub trait OutputParser: Send + Sync {
    async fn parse(&self, completion: &str) -> Result<Metadata>;

    /// Text inserted into the prompt describing the expected output
    fn format_instructions(&self) -> String;
}

/// Pull the JSON object out of a completion
///
/// Handles reasoning blocks (`<think>...</think>`), markdown code fences, and
/// prose around the object.
pub fn extract_json(completion: &str) -> Option<String> {
    let without_thinking = THINK_BLOCK.replace_all(completion, "");
    let text = without_thinking.trim();

    let candidate = FENCED_JSON
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|inner| inner.starts_with('{'))
        .unwrap_or(text);

    let start = candidate.find('{')?;
    let end = candidate.rfind('}')?;
    (end > start).then(|| candidate[start..=end].to_string())
}

/// Strict parser: the completion must contain one JSON object matching the schema
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonOutputParser;

impl JsonOutputParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_str(&self, completion: &str) -> Result<Metadata> {
        let json = extract_json(completion)
            .ok_or_else(|| DocPortalError::analysis("No JSON object found in LLM response"))?;

        Metadata::from_json(&json)
            .map_err(|e| DocPortalError::analysis_with("Failed to parse metadata JSON", e))
    }
}

#[async_trait]
impl OutputParser for JsonOutputParser {
    async fn parse(&self, completion: &str) -> Result<Metadata> {
        self.parse_str(completion)
    }

    fn format_instructions(&self) -> String {
        format_instructions()
    }
}

/// Fallback parser that asks the model to repair output the strict parser rejected
pub struct OutputFixingParser {
    inner: JsonOutputParser,
    client: Arc<dyn ChatClient>,
    prompt: PromptTemplate,
    max_retries: usize,
    log: SharedSink,
}

impl OutputFixingParser {
    pub fn new(client: Arc<dyn ChatClient>) -> Result<Self> {
        Ok(Self {
            inner: JsonOutputParser::new(),
            client,
            prompt: PromptTemplate::parse(FIX_PROMPT)?,
            max_retries: 1,
            log: TracingSink::shared(),
        })
    }

    pub fn with_log_sink(mut self, log: SharedSink) -> Self {
        self.log = log;
        self
    }

    /// Number of repair round-trips attempted before giving up
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Ask the model to fix `completion`, which failed with `error`
    pub async fn repair(&self, completion: &str, error: &DocPortalError) -> Result<Metadata> {
        let instructions = self.inner.format_instructions();
        let mut completion = completion.to_string();
        let mut last_error = error_chain(error);

        for attempt in 1..=self.max_retries {
            self.log.debug(
                "Repairing metadata output",
                &[
                    ("attempt", attempt.to_string()),
                    ("error", last_error.clone()),
                ],
            );

            let values = HashMap::from([
                ("instructions", instructions.as_str()),
                ("completion", completion.as_str()),
                ("error", last_error.as_str()),
            ]);
            let prompt = self.prompt.render(&values)?;
            completion = self.client.invoke(&prompt).await?;

            match self.inner.parse_str(&completion) {
                Ok(metadata) => return Ok(metadata),
                Err(e) => last_error = error_chain(&e),
            }
        }

        Err(DocPortalError::analysis(format!(
            "Output could not be repaired after {} attempt(s): {}",
            self.max_retries, last_error
        )))
    }
}

#[async_trait]
impl OutputParser for OutputFixingParser {
    async fn parse(&self, completion: &str) -> Result<Metadata> {
        match self.inner.parse_str(completion) {
            Ok(metadata) => Ok(metadata),
            Err(e) => self.repair(completion, &e).await,
        }
    }

    fn format_instructions(&self) -> String {
        self.inner.format_instructions()
    }
}

/// Render an error with its causes, e.g. `Failed to parse: missing field ...`
fn error_chain(error: &DocPortalError) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
