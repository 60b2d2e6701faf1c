use std::sync::Arc;

use crate::llm::{LlmProvider, Prompt, ProviderError};

/// Turns query text into a vector of the deployment's dimension.
#[derive(Clone)]
pub struct QueryEmbedder {
    provider: Arc<dyn LlmProvider>,
}

impl QueryEmbedder {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    pub fn dimensions(&self) -> usize {
        self.provider.dimensions()
    }

    pub async fn embed(&self, query: &str) -> Result<Vec<f32>, ProviderError> {
        let embedding = self.provider.embed(query).await?;
        if embedding.len() != self.dimensions() {
            return Err(ProviderError::DimensionMismatch {
                expected: self.dimensions(),
                actual: embedding.len(),
            });
        }
        Ok(embedding)
    }
}

/// Produces the final answer text from a rendered prompt.
#[derive(Clone)]
pub struct AnswerGenerator {
    provider: Arc<dyn LlmProvider>,
}

impl AnswerGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    pub async fn generate(&self, prompt: &Prompt) -> Result<String, ProviderError> {
        self.provider.generate(prompt).await
    }
}
