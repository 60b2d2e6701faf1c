//! Read-only nearest-neighbour search used by the request path.
//!
//! The production implementation is `MongoVectorIndex` in the `mongo` module.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// A stored document as written by the ingestion job.
///
/// Metadata fields sit next to `text` and `embedding` at the top level of the
/// stored record; the request path never reads them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub text: String,
    pub embedding: Vec<f32>,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

/// Result of a similarity search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub text: String,
    /// Similarity score (higher = better).
    pub score: f64,
}

impl SearchResult {
    pub fn new(text: impl Into<String>, score: f64) -> Self {
        Self {
            text: text.into(),
            score,
        }
    }
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("{0}")]
    Unavailable(String),
    #[error("{0}")]
    Malformed(String),
}

/// Approximate nearest-neighbour search over the persisted embeddings.
///
/// Implementations return at most their configured limit, ordered by
/// descending score.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    async fn search(&self, query_vector: &[f32]) -> Result<Vec<SearchResult>, SearchError>;
}

/// Keep the index's order but make sure it is descending and capped at
/// `limit`. Results without a finite score are dropped. The sort is stable,
/// so equal scores stay in the order the index produced them.
pub fn rank_and_truncate(mut results: Vec<SearchResult>, limit: usize) -> Vec<SearchResult> {
    results.retain(|result| result.score.is_finite());
    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    results.truncate(limit);
    results
}
