//! Metadata extraction over document text

use super::metadata::Metadata;
use super::parser::{JsonOutputParser, OutputFixingParser, OutputParser};
use super::prompt::{PromptTemplate, DOCUMENT_ANALYSIS_PROMPT};
use crate::error::{DocPortalError, Result};
use crate::llm::{ChatClient, ChatMessage, ModelLoader};
use crate::logging::SharedSink;
use std::collections::HashMap;
use std::sync::Arc;

/// Sends document text to a chat model and parses the structured answer
pub struct DocumentAnalyzer {
    client: Arc<dyn ChatClient>,
    prompt: PromptTemplate,
    parser: JsonOutputParser,
    fixing_parser: OutputFixingParser,
    log: SharedSink,
}

impl DocumentAnalyzer {
    pub fn new(client: Arc<dyn ChatClient>, log: SharedSink) -> Result<Self> {
        let analyzer = Self {
            prompt: PromptTemplate::parse(DOCUMENT_ANALYSIS_PROMPT)?,
            parser: JsonOutputParser::new(),
            fixing_parser: OutputFixingParser::new(Arc::clone(&client))?
                .with_log_sink(Arc::clone(&log)),
            client,
            log,
        };
        analyzer.log.info(
            "DocumentAnalyzer initialized",
            &[
                ("provider", analyzer.client.provider().to_string()),
                ("model", analyzer.client.model_name().to_string()),
            ],
        );
        Ok(analyzer)
    }

    /// Build with the loader's active chat model and log sink
    pub fn from_loader(loader: &ModelLoader) -> Result<Self> {
        let client = loader.load_llm()?;
        Self::new(client, loader.log_sink())
    }

    pub fn client(&self) -> &Arc<dyn ChatClient> {
        &self.client
    }

    /// The prompt sent for `document_text`
    pub fn render_prompt(&self, document_text: &str) -> Result<String> {
        let instructions = self.parser.format_instructions();
        let values = HashMap::from([
            ("format_instructions", instructions.as_str()),
            ("document_text", document_text),
        ]);
        self.prompt.render(&values)
    }

    /// Extract metadata from document text
    ///
    /// Blank input is rejected without contacting the model. A response the
    /// strict parser rejects gets one repair round-trip. Every failure is
    /// reported as [`DocPortalError::Analysis`].
    pub async fn analyze(&self, document_text: &str) -> Result<Metadata> {
        match self.run(document_text).await {
            Ok(metadata) => {
                self.log.info(
                    "Metadata extraction successful",
                    &[
                        ("title", metadata.title.clone()),
                        ("page_count", metadata.page_count.to_string()),
                    ],
                );
                Ok(metadata)
            }
            Err(e) => {
                self.log
                    .error("Metadata analysis failed", &[("error", e.to_string())]);
                Err(match e {
                    DocPortalError::Analysis { .. } => e,
                    other => DocPortalError::analysis_with("Metadata extraction failed", other),
                })
            }
        }
    }

    async fn run(&self, document_text: &str) -> Result<Metadata> {
        if document_text.trim().is_empty() {
            return Err(DocPortalError::analysis("Document text is empty"));
        }

        let prompt = self.render_prompt(document_text)?;
        let completion = self.client.complete(vec![ChatMessage::user(prompt)]).await?;
        self.log.debug(
            "LLM response received",
            &[("chars", completion.len().to_string())],
        );

        match self.parser.parse_str(&completion) {
            Ok(metadata) => Ok(metadata),
            Err(e) => {
                self.log.debug(
                    "Strict parse failed, attempting repair",
                    &[("error", e.to_string())],
                );
                self.fixing_parser.repair(&completion, &e).await
            }
        }
    }
}
