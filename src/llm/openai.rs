use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::error::ProviderError;
use super::provider::{build_http_client, parse_embedding, send_json, LlmProvider};
use super::types::Prompt;
use crate::core::config::OpenAiConfig;

const PROVIDER: &str = "openai";

/// OpenAI REST backend. Embeddings are requested with an explicit
/// `dimensions` so the model output matches the index.
#[derive(Clone)]
pub struct OpenAiProvider {
    base_url: String,
    api_key: String,
    embedding_model: String,
    chat_model: String,
    dimensions: usize,
    client: Client,
}

impl OpenAiProvider {
    pub fn new(
        config: &OpenAiConfig,
        dimensions: usize,
        timeout_secs: u64,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().unwrap_or_default(),
            embedding_model: config.embedding_model.clone(),
            chat_model: config.chat_model.clone(),
            dimensions,
            client: build_http_client(timeout_secs)?,
        })
    }

    fn embedding_body(&self, text: &str) -> Value {
        json!({
            "model": self.embedding_model,
            "input": text,
            "dimensions": self.dimensions,
        })
    }

    fn chat_body(&self, prompt: &Prompt) -> Value {
        json!({
            "model": self.chat_model,
            "messages": prompt.messages,
        })
    }
}

pub(crate) fn parse_embedding_response(
    payload: &Value,
    dimensions: usize,
) -> Result<Vec<f32>, ProviderError> {
    parse_embedding(
        PROVIDER,
        "data[0].embedding",
        payload.pointer("/data/0/embedding"),
        dimensions,
    )
}

pub(crate) fn parse_chat_response(payload: &Value) -> Result<String, ProviderError> {
    payload
        .pointer("/choices/0/message/content")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or(ProviderError::MissingField {
            provider: PROVIDER,
            field: "choices[0].message.content",
        })
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn health_check(&self) -> bool {
        let url = format!("{}/models", self.base_url);
        let res = self.client.get(&url).bearer_auth(&self.api_key).send().await;
        match res {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let url = format!("{}/embeddings", self.base_url);
        let request = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.embedding_body(text));

        let payload = send_json(PROVIDER, request).await?;
        parse_embedding_response(&payload, self.dimensions)
    }

    async fn generate(&self, prompt: &Prompt) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.chat_body(prompt));

        let payload = send_json(PROVIDER, request).await?;
        parse_chat_response(&payload)
    }
}
