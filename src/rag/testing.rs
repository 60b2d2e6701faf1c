//! In-memory provider and index used by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::store::{SearchError, SearchResult, VectorIndex};
use crate::llm::{LlmProvider, Prompt, ProviderError};

pub struct StubProvider {
    embedding: Vec<f32>,
    dimensions: usize,
    answer: String,
    embed_error: Option<String>,
    generate_error: Option<String>,
    embed_delay: Option<Duration>,
    embed_calls: AtomicUsize,
    generate_calls: AtomicUsize,
    embedded: Mutex<Vec<String>>,
    prompts: Mutex<Vec<Prompt>>,
}

impl StubProvider {
    pub fn new(embedding: Vec<f32>) -> Self {
        Self {
            dimensions: embedding.len(),
            embedding,
            answer: "stub answer".to_string(),
            embed_error: None,
            generate_error: None,
            embed_delay: None,
            embed_calls: AtomicUsize::new(0),
            generate_calls: AtomicUsize::new(0),
            embedded: Mutex::new(Vec::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_embed(message: &str) -> Self {
        let mut stub = Self::new(vec![0.0, 0.0]);
        stub.embed_error = Some(message.to_string());
        stub
    }

    pub fn failing_generate(mut self, message: &str) -> Self {
        self.generate_error = Some(message.to_string());
        self
    }

    pub fn with_answer(mut self, answer: &str) -> Self {
        self.answer = answer.to_string();
        self
    }

    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    pub fn with_embed_delay(mut self, delay: Duration) -> Self {
        self.embed_delay = Some(delay);
        self
    }

    pub fn embed_calls(&self) -> usize {
        self.embed_calls.load(Ordering::SeqCst)
    }

    pub fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }

    pub fn embedded_texts(&self) -> Vec<String> {
        self.embedded.lock().unwrap().clone()
    }

    pub fn last_prompt(&self) -> Option<Prompt> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LlmProvider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn health_check(&self) -> bool {
        true
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        self.embed_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.embed_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = &self.embed_error {
            return Err(ProviderError::Request(message.clone()));
        }
        self.embedded.lock().unwrap().push(text.to_string());
        Ok(self.embedding.clone())
    }

    async fn generate(&self, prompt: &Prompt) -> Result<String, ProviderError> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.clone());
        if let Some(message) = &self.generate_error {
            return Err(ProviderError::Request(message.clone()));
        }
        Ok(self.answer.clone())
    }
}

pub struct StubIndex {
    results: Vec<SearchResult>,
    error: Option<String>,
    search_calls: AtomicUsize,
    queries: Mutex<Vec<Vec<f32>>>,
}

impl StubIndex {
    pub fn with_results(results: Vec<SearchResult>) -> Self {
        Self {
            results,
            error: None,
            search_calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        let mut stub = Self::with_results(Vec::new());
        stub.error = Some(message.to_string());
        stub
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<Vec<f32>> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl VectorIndex for StubIndex {
    async fn search(&self, query_vector: &[f32]) -> Result<Vec<SearchResult>, SearchError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query_vector.to_vec());
        if let Some(message) = &self.error {
            return Err(SearchError::Unavailable(message.clone()));
        }
        Ok(self.results.clone())
    }
}
