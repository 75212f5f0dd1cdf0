//! Credential validation
//!
//! API keys are resolved once at startup into a [`CredentialSet`]. Client
//! construction reads from that value instead of the process environment.

use crate::error::{DocPortalError, Result};
use std::collections::BTreeMap;
use std::fmt;

pub const GROQ_API_KEY: &str = "GROQ_API_KEY";
pub const HF_TOKEN: &str = "HF_TOKEN";
pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";

/// Credentials required at startup, regardless of the active provider
pub const REQUIRED_CREDENTIALS: [&str; 3] = [GROQ_API_KEY, HF_TOKEN, GOOGLE_API_KEY];

/// Resolved, non-empty credential values
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CredentialSet {
    values: BTreeMap<String, String>,
}

impl CredentialSet {
    /// Resolve `required` from the process environment
    pub fn validate(required: &[&str]) -> Result<Self> {
        Self::validate_with(required, |key| std::env::var(key).ok())
    }

    /// Resolve `required` through `lookup`
    ///
    /// Empty values count as missing. The error names every missing key, in
    /// the order given.
    pub fn validate_with<F>(required: &[&str], mut lookup: F) -> Result<Self>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut values = BTreeMap::new();
        let mut missing: Vec<String> = Vec::new();

        for key in required {
            if values.contains_key(*key) || missing.iter().any(|m| m == key) {
                continue;
            }
            match lookup(key) {
                Some(value) if !value.trim().is_empty() => {
                    values.insert(key.to_string(), value);
                }
                _ => missing.push(key.to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(DocPortalError::MissingCredentials(missing));
        }

        Ok(Self { values })
    }

    /// Build a set directly, without validation
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Value for `key`, or `MissingCredentials` naming it
    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key)
            .ok_or_else(|| DocPortalError::MissingCredentials(vec![key.to_string()]))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for CredentialSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.values.keys().map(|k| (k, "***")))
            .finish()
    }
}
