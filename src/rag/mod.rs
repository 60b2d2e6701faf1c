//! Retrieval-augmented generation.
//!
//! This module provides:
//! - `RagPipeline`: answers one question from retrieved policy text
//! - `MongoVectorIndex`: Atlas `$vectorSearch` over the embedded documents
//! - `Ingestor`: flattens and embeds insurance records for the seed binary

mod context_builder;
mod embedder;
mod ingest;
mod mongo;
mod pipeline;
mod prompt;
mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use context_builder::{ContextBuilder, EMPTY_CONTEXT};
pub use embedder::{AnswerGenerator, QueryEmbedder};
pub use ingest::{flatten_record, parse_records, Claim, Ingestor, InsuranceRecord};
pub use mongo::{build_search_pipeline, MongoHandle, MongoVectorIndex, SearchSettings};
pub use pipeline::{Answer, PipelineError, Query, RagPipeline, Stage, NO_RESULTS_ANSWER};
pub use prompt::{PromptBuilder, SYSTEM_DIRECTIVE};
pub use store::{rank_and_truncate, DocumentChunk, SearchError, SearchResult, VectorIndex};
