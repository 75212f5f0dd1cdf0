//! Shared HTTP plumbing for provider clients

use crate::error::{DocPortalError, Result};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Build a reqwest client, applying `timeout_secs` when configured
pub(crate) fn build_client(provider: &str, timeout_secs: Option<u64>) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build().map_err(|e| {
        DocPortalError::model_load_with(format!("Failed to build HTTP client for {}", provider), e)
    })
}

/// Send a prepared request and decode a JSON body
pub(crate) async fn send_json<R: DeserializeOwned>(
    provider: &str,
    request: reqwest::RequestBuilder,
) -> Result<R> {
    let response = request
        .send()
        .await
        .map_err(|e| DocPortalError::provider_with(provider, "request failed", e))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(DocPortalError::provider(
            provider,
            format!("HTTP {}: {}", status, body),
        ));
    }

    response
        .json::<R>()
        .await
        .map_err(|e| DocPortalError::provider_with(provider, "invalid response body", e))
}

/// Strip a trailing slash so paths can be appended with `format!`
pub(crate) fn trim_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
