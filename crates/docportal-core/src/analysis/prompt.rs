//! Prompt templates with `{name}` placeholders

use crate::error::{DocPortalError, Result};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::HashMap;

lazy_static! {
    /// `{{` and `}}` are literal braces; `{name}` is a placeholder
    static ref PLACEHOLDER: Regex =
        Regex::new(r"\{\{|\}\}|\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid placeholder regex");
}

/// Prompt used for document metadata extraction
pub const DOCUMENT_ANALYSIS_PROMPT: &str = "You are a highly capable assistant trained to analyze and summarize documents.
Return ONLY valid JSON matching the exact schema below.

{format_instructions}

Analyze this document:
{document_text}";

/// A parsed template and the variables it expects
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
    input_variables: Vec<String>,
}

impl PromptTemplate {
    /// Parse a template, collecting its placeholder names in order of first use
    pub fn parse(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        let mut input_variables: Vec<String> = Vec::new();

        for caps in PLACEHOLDER.captures_iter(&template) {
            if let Some(name) = caps.get(1) {
                if !input_variables.iter().any(|v| v == name.as_str()) {
                    input_variables.push(name.as_str().to_string());
                }
            }
        }

        // A lone brace left after removing placeholders and escapes is malformed
        let stripped = PLACEHOLDER.replace_all(&template, "");
        if stripped.contains('{') || stripped.contains('}') {
            return Err(DocPortalError::analysis(
                "Prompt template contains an unmatched brace",
            ));
        }

        Ok(Self {
            template,
            input_variables,
        })
    }

    pub fn input_variables(&self) -> &[String] {
        &self.input_variables
    }

    /// Substitute every placeholder; a missing variable is an error
    pub fn render(&self, values: &HashMap<&str, &str>) -> Result<String> {
        let missing: Vec<&str> = self
            .input_variables
            .iter()
            .map(String::as_str)
            .filter(|v| !values.contains_key(v))
            .collect();
        if !missing.is_empty() {
            return Err(DocPortalError::analysis(format!(
                "Missing prompt variables: {}",
                missing.join(", ")
            )));
        }

        let rendered = PLACEHOLDER.replace_all(&self.template, |caps: &Captures| {
            match caps.get(1) {
                Some(name) => values.get(name.as_str()).copied().unwrap_or_default().to_string(),
                None => caps[0][..1].to_string(),
            }
        });
        Ok(rendered.into_owned())
    }
}
