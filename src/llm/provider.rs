use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;

use super::error::ProviderError;
use super::types::Prompt;

/// Embedding + generation capability. One implementation is chosen at start-up
/// and shared by every request; the vector index is built for its `dimensions`.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// return the provider name (e.g. "openai", "ollama")
    fn name(&self) -> &str;

    /// length of every vector returned by `embed`
    fn dimensions(&self) -> usize;

    /// check if the provider is reachable
    async fn health_check(&self) -> bool;

    /// embed a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError>;

    /// chat completion (non-streaming)
    async fn generate(&self, prompt: &Prompt) -> Result<String, ProviderError>;
}

pub(crate) fn build_http_client(timeout_secs: u64) -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(ProviderError::from)
}

/// Send a JSON request and decode a JSON response, mapping non-2xx replies to
/// `ProviderError::Status` with the upstream error message.
pub(crate) async fn send_json(
    provider: &'static str,
    request: RequestBuilder,
) -> Result<Value, ProviderError> {
    let res = request.send().await?;

    let status = res.status();
    if !status.is_success() {
        let text = res.text().await.unwrap_or_default();
        return Err(ProviderError::Status {
            provider,
            status: status.as_u16(),
            body: extract_error_message(&text),
        });
    }

    Ok(res.json::<Value>().await?)
}

/// Pull `error.message` (OpenAI) or `error` (Ollama) out of an error body,
/// falling back to the raw text.
pub(crate) fn extract_error_message(body: &str) -> String {
    let Ok(payload) = serde_json::from_str::<Value>(body) else {
        return body.trim().to_string();
    };
    payload
        .get("error")
        .and_then(|err| err.get("message").or(Some(err)))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| body.trim().to_string())
}

/// Convert a JSON number array into an embedding, checking its length.
pub(crate) fn parse_embedding(
    provider: &'static str,
    field: &'static str,
    value: Option<&Value>,
    expected: usize,
) -> Result<Vec<f32>, ProviderError> {
    let values = value
        .and_then(|v| v.as_array())
        .ok_or(ProviderError::MissingField { provider, field })?;

    let embedding = values
        .iter()
        .map(|v| v.as_f64().map(|f| f as f32))
        .collect::<Option<Vec<f32>>>()
        .ok_or(ProviderError::MissingField { provider, field })?;

    if embedding.len() != expected {
        return Err(ProviderError::DimensionMismatch {
            expected,
            actual: embedding.len(),
        });
    }
    Ok(embedding)
}
