use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::error::ProviderError;
use super::provider::{build_http_client, parse_embedding, send_json, LlmProvider};
use super::types::Prompt;
use crate::core::config::OllamaConfig;

const PROVIDER: &str = "ollama";

/// Local Ollama server using its native `/api` endpoints. The embedding
/// length is whatever the model produces; `dimensions` must be configured to
/// match it.
#[derive(Clone)]
pub struct OllamaProvider {
    base_url: String,
    embedding_model: String,
    chat_model: String,
    dimensions: usize,
    client: Client,
}

impl OllamaProvider {
    pub fn new(
        config: &OllamaConfig,
        dimensions: usize,
        timeout_secs: u64,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            embedding_model: config.embedding_model.clone(),
            chat_model: config.chat_model.clone(),
            dimensions,
            client: build_http_client(timeout_secs)?,
        })
    }

    fn embedding_body(&self, text: &str) -> Value {
        json!({
            "model": self.embedding_model,
            "prompt": text,
        })
    }

    fn chat_body(&self, prompt: &Prompt) -> Value {
        json!({
            "model": self.chat_model,
            "messages": prompt.messages,
            "stream": false,
        })
    }
}

pub(crate) fn parse_embedding_response(
    payload: &Value,
    dimensions: usize,
) -> Result<Vec<f32>, ProviderError> {
    parse_embedding(PROVIDER, "embedding", payload.get("embedding"), dimensions)
}

pub(crate) fn parse_chat_response(payload: &Value) -> Result<String, ProviderError> {
    payload
        .pointer("/message/content")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or(ProviderError::MissingField {
            provider: PROVIDER,
            field: "message.content",
        })
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn health_check(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        match self.client.get(&url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let url = format!("{}/api/embeddings", self.base_url);
        let request = self.client.post(&url).json(&self.embedding_body(text));

        let payload = send_json(PROVIDER, request).await?;
        parse_embedding_response(&payload, self.dimensions)
    }

    async fn generate(&self, prompt: &Prompt) -> Result<String, ProviderError> {
        let url = format!("{}/api/chat", self.base_url);
        let request = self.client.post(&url).json(&self.chat_body(prompt));

        let payload = send_json(PROVIDER, request).await?;
        parse_chat_response(&payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::types::ChatMessage;

    fn provider() -> OllamaProvider {
        OllamaProvider::new(&OllamaConfig::default(), 3, 5).unwrap()
    }

    #[test]
    fn embedding_request_uses_prompt_field() {
        let body = provider().embedding_body("hello");
        assert_eq!(body["model"], "nomic-embed-text");
        assert_eq!(body["prompt"], "hello");
        assert!(body.get("dimensions").is_none());
    }

    #[test]
    fn chat_request_disables_streaming() {
        let body = provider().chat_body(&Prompt::new(vec![ChatMessage::user("hi")]));
        assert_eq!(body["stream"], false);
        assert_eq!(body["messages"][0]["role"], "user");
    }

    #[test]
    fn parses_native_payloads() {
        let embedding = parse_embedding_response(&json!({"embedding": [1.0, 0.0, 0.5]}), 3).unwrap();
        assert_eq!(embedding, vec![1.0, 0.0, 0.5]);

        let answer =
            parse_chat_response(&json!({"message": {"role": "assistant", "content": "ok"}})).unwrap();
        assert_eq!(answer, "ok");
    }

    #[test]
    fn missing_message_is_reported() {
        let err = parse_chat_response(&json!({"done": true})).unwrap_err();
        assert_eq!(err.to_string(), "ollama response is missing `message.content`");
    }
}
