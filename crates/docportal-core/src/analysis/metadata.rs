//! Document metadata schema

use serde::{Deserialize, Serialize};
use std::fmt;

/// Page count as reported by the model: a number, or text such as "Not Available"
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum PageCount {
    Count(u32),
    Text(String),
}

impl fmt::Display for PageCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Structured metadata extracted from a document
///
/// Keys are PascalCase on the wire. Unknown keys are rejected so that a
/// response that drifted from the schema fails parsing instead of being
/// partially accepted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct Metadata {
    /// Summary points
    #[serde(default)]
    pub summary: Vec<String>,
    pub title: String,
    pub author: Vec<String>,
    pub date_created: String,
    pub last_modified_date: String,
    pub publisher: String,
    pub language: String,
    pub page_count: PageCount,
    pub sentiment_tone: String,
}

impl Metadata {
    /// Field names as they appear in JSON
    pub const FIELDS: [&'static str; 9] = [
        "Summary",
        "Title",
        "Author",
        "DateCreated",
        "LastModifiedDate",
        "Publisher",
        "Language",
        "PageCount",
        "SentimentTone",
    ];

    /// Parse from JSON string
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Convert to JSON string
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// JSON schema of [`Metadata`], embedded in the prompt's format instructions
pub const METADATA_SCHEMA: &str = r#"{"title": "Metadata", "type": "object", "properties": {"Summary": {"title": "Summary", "description": "Summary of the document", "type": "array", "items": {"type": "string"}}, "Title": {"title": "Title", "type": "string"}, "Author": {"title": "Author", "type": "array", "items": {"type": "string"}}, "DateCreated": {"title": "Datecreated", "type": "string"}, "LastModifiedDate": {"title": "Lastmodifieddate", "type": "string"}, "Publisher": {"title": "Publisher", "type": "string"}, "Language": {"title": "Language", "type": "string"}, "PageCount": {"title": "Pagecount", "anyOf": [{"type": "integer"}, {"type": "string"}]}, "SentimentTone": {"title": "Sentimenttone", "type": "string"}}, "required": ["Title", "Author", "DateCreated", "LastModifiedDate", "Publisher", "Language", "PageCount", "SentimentTone"], "additionalProperties": false}"#;

/// Instructions telling the model how to shape its answer
pub fn format_instructions() -> String {
    format!(
        r#"The output should be formatted as a JSON instance that conforms to the JSON schema below.

As an example, for the schema {{"properties": {{"foo": {{"title": "Foo", "description": "a list of strings", "type": "array", "items": {{"type": "string"}}}}}}, "required": ["foo"]}}
the object {{"foo": ["bar", "baz"]}} is a well-formatted instance of the schema. The object {{"properties": {{"foo": ["bar", "baz"]}}}} is not well-formatted.

Here is the output schema:
```
{}
```"#,
        METADATA_SCHEMA
    )
}
