//! Retrieval-augmented answering.
//!
//! One request runs embed → search → assemble → prompt → generate in order.
//! Each network stage is attempted once; the first failure ends the request
//! and is reported with the stage it happened in. Dropping the returned
//! future abandons the in-flight call and no later stage runs.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use super::context_builder::ContextBuilder;
use super::embedder::{AnswerGenerator, QueryEmbedder};
use super::prompt::PromptBuilder;
use super::store::{SearchError, VectorIndex};
use crate::core::config::ContextConfig;
use crate::llm::{LlmProvider, ProviderError};

pub const NO_RESULTS_ANSWER: &str = "No relevant information found.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Embedding,
    Search,
    Generation,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Embedding => "embedding",
            Stage::Search => "search",
            Stage::Generation => "generation",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Query is required")]
    EmptyQuery,
    #[error(transparent)]
    Embedding(ProviderError),
    #[error(transparent)]
    Search(SearchError),
    #[error(transparent)]
    Generation(ProviderError),
}

impl PipelineError {
    /// Stage that failed; `None` when the query was rejected up front.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineError::EmptyQuery => None,
            PipelineError::Embedding(_) => Some(Stage::Embedding),
            PipelineError::Search(_) => Some(Stage::Search),
            PipelineError::Generation(_) => Some(Stage::Generation),
        }
    }
}

/// A validated, trimmed, non-empty question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    pub fn parse(raw: &str) -> Result<Self, PipelineError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PipelineError::EmptyQuery);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Generated(String),
    /// The index returned nothing; the model was not consulted.
    NoRelevantInformation,
}

impl Answer {
    pub fn text(&self) -> &str {
        match self {
            Answer::Generated(text) => text,
            Answer::NoRelevantInformation => NO_RESULTS_ANSWER,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Answer::Generated(text) => text,
            Answer::NoRelevantInformation => NO_RESULTS_ANSWER.to_string(),
        }
    }
}

pub struct RagPipeline {
    embedder: QueryEmbedder,
    index: Arc<dyn VectorIndex>,
    context: ContextBuilder,
    prompts: PromptBuilder,
    generator: AnswerGenerator,
}

impl RagPipeline {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        index: Arc<dyn VectorIndex>,
        context: &ContextConfig,
    ) -> Self {
        Self {
            embedder: QueryEmbedder::new(provider.clone()),
            index,
            context: ContextBuilder::new(context),
            prompts: PromptBuilder::new(),
            generator: AnswerGenerator::new(provider),
        }
    }

    pub async fn answer(&self, raw_query: &str) -> Result<Answer, PipelineError> {
        let query = Query::parse(raw_query)?;

        let result = self.run(&query).await;
        if let Err(err) = &result {
            if let Some(stage) = err.stage() {
                tracing::error!(stage = stage.as_str(), "RAG pipeline failed: {:?}", err);
            }
        }
        result
    }

    async fn run(&self, query: &Query) -> Result<Answer, PipelineError> {
        tracing::debug!(stage = "embedding", "Embedding query ({} chars)", query.as_str().len());
        let vector = self
            .embedder
            .embed(query.as_str())
            .await
            .map_err(PipelineError::Embedding)?;

        tracing::debug!(stage = "search", "Searching vector index");
        let results = self
            .index
            .search(&vector)
            .await
            .map_err(PipelineError::Search)?;

        if results.is_empty() {
            tracing::warn!("Vector search returned no results; skipping generation");
            return Ok(Answer::NoRelevantInformation);
        }
        tracing::info!("Retrieved {} chunks", results.len());

        let context = self.context.assemble(&results);
        let prompt = self.prompts.build(&context, query.as_str());

        tracing::debug!(stage = "generation", "Generating answer");
        let answer = self
            .generator
            .generate(&prompt)
            .await
            .map_err(PipelineError::Generation)?;

        Ok(Answer::Generated(answer))
    }
}
