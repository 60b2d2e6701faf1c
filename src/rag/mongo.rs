//! MongoDB Atlas vector search backend.
//!
//! `MongoHandle` owns the process-wide connection and opens it lazily on
//! first use; `MongoVectorIndex` runs `$vectorSearch` aggregations through it.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::{Client, Collection, Database};
use tokio::sync::OnceCell;

use super::store::{rank_and_truncate, DocumentChunk, SearchError, SearchResult, VectorIndex};
use crate::core::config::{DatabaseConfig, VectorSearchConfig};

/// Lazily established database connection shared by every request.
pub struct MongoHandle {
    uri: String,
    database: String,
    db: OnceCell<Database>,
}

impl MongoHandle {
    pub fn new(config: &DatabaseConfig) -> Self {
        Self {
            uri: config.uri.clone(),
            database: config.name.clone(),
            db: OnceCell::new(),
        }
    }

    /// Connect and ping on the first call; later and concurrent callers get
    /// the same `Database`. A failed attempt leaves the cell empty so the
    /// next call retries.
    pub async fn connect_once(&self) -> Result<&Database, SearchError> {
        self.db
            .get_or_try_init(|| async {
                let client = Client::with_uri_str(&self.uri)
                    .await
                    .map_err(|e| SearchError::Unavailable(e.to_string()))?;
                let db = client.database(&self.database);
                db.run_command(doc! { "ping": 1 })
                    .await
                    .map_err(|e| SearchError::Unavailable(e.to_string()))?;
                tracing::info!("MongoDB connected (database '{}')", self.database);
                Ok::<Database, SearchError>(db)
            })
            .await
    }

    pub fn is_connected(&self) -> bool {
        self.db.initialized()
    }

    pub async fn collection(&self, name: &str) -> Result<Collection<Document>, SearchError> {
        Ok(self.connect_once().await?.collection::<Document>(name))
    }
}

/// Fixed query parameters for one deployment.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub collection: String,
    pub index: String,
    pub path: String,
    pub num_candidates: u32,
    pub limit: u32,
    pub dimensions: usize,
}

impl SearchSettings {
    pub fn from_config(
        database: &DatabaseConfig,
        search: &VectorSearchConfig,
        dimensions: usize,
    ) -> Self {
        Self {
            collection: database.collection.clone(),
            index: search.index.clone(),
            path: search.path.clone(),
            num_candidates: search.num_candidates,
            limit: search.limit,
            dimensions,
        }
    }
}

/// Two-stage aggregation: ANN search, then project the text and the search
/// score.
pub fn build_search_pipeline(query_vector: &[f32], settings: &SearchSettings) -> Vec<Document> {
    let vector: Vec<Bson> = query_vector
        .iter()
        .map(|v| Bson::Double(f64::from(*v)))
        .collect();

    vec![
        doc! {
            "$vectorSearch": {
                "queryVector": vector,
                "path": settings.path.as_str(),
                "numCandidates": i64::from(settings.num_candidates),
                "limit": i64::from(settings.limit),
                "index": settings.index.as_str(),
            }
        },
        doc! {
            "$project": {
                "text": 1,
                "score": { "$meta": "vectorSearchScore" },
            }
        },
    ]
}

fn decode_result(document: &Document) -> Result<SearchResult, SearchError> {
    let text = document
        .get_str("text")
        .map_err(|_| SearchError::Malformed("search result is missing `text`".to_string()))?;
    let score = match document.get("score") {
        Some(Bson::Double(v)) => *v,
        Some(Bson::Int32(v)) => f64::from(*v),
        Some(Bson::Int64(v)) => *v as f64,
        _ => {
            return Err(SearchError::Malformed(
                "search result is missing `score`".to_string(),
            ))
        }
    };
    if !score.is_finite() {
        return Err(SearchError::Malformed(format!(
            "search result has a non-finite score ({})",
            score
        )));
    }
    Ok(SearchResult::new(text, score))
}

pub struct MongoVectorIndex {
    handle: std::sync::Arc<MongoHandle>,
    settings: SearchSettings,
}

impl MongoVectorIndex {
    pub fn new(handle: std::sync::Arc<MongoHandle>, settings: SearchSettings) -> Self {
        Self { handle, settings }
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// Bulk insert used by the ingestion job. Returns the number of
    /// documents written.
    pub async fn insert_documents(&self, chunks: &[DocumentChunk]) -> Result<usize, SearchError> {
        if chunks.is_empty() {
            return Ok(0);
        }
        for chunk in chunks {
            self.check_dimensions(chunk.embedding.len())?;
        }

        let documents = chunks
            .iter()
            .map(mongodb::bson::to_document)
            .collect::<Result<Vec<Document>, _>>()
            .map_err(|e| SearchError::Malformed(e.to_string()))?;

        let collection = self.handle.collection(&self.settings.collection).await?;
        let result = collection
            .insert_many(documents)
            .await
            .map_err(|e| SearchError::Unavailable(e.to_string()))?;
        Ok(result.inserted_ids.len())
    }

    fn check_dimensions(&self, actual: usize) -> Result<(), SearchError> {
        if actual != self.settings.dimensions {
            return Err(SearchError::Malformed(format!(
                "query vector has {} dimensions, index expects {}",
                actual, self.settings.dimensions
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl VectorIndex for MongoVectorIndex {
    async fn search(&self, query_vector: &[f32]) -> Result<Vec<SearchResult>, SearchError> {
        self.check_dimensions(query_vector.len())?;

        let collection = self.handle.collection(&self.settings.collection).await?;
        let pipeline = build_search_pipeline(query_vector, &self.settings);

        let mut cursor = collection
            .aggregate(pipeline)
            .await
            .map_err(|e| SearchError::Unavailable(e.to_string()))?;

        let mut results = Vec::new();
        while let Some(document) = cursor
            .try_next()
            .await
            .map_err(|e| SearchError::Unavailable(e.to_string()))?
        {
            results.push(decode_result(&document)?);
        }

        Ok(rank_and_truncate(results, self.settings.limit as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn settings() -> SearchSettings {
        SearchSettings::from_config(
            &DatabaseConfig::default(),
            &VectorSearchConfig::default(),
            2,
        )
    }

    #[test]
    fn pipeline_matches_the_storage_contract() {
        let pipeline = build_search_pipeline(&[0.1, 0.2], &settings());
        assert_eq!(pipeline.len(), 2);

        let search = pipeline[0].get_document("$vectorSearch").unwrap();
        assert_eq!(search.get_str("path").unwrap(), "embedding");
        assert_eq!(search.get_str("index").unwrap(), "insurance_vector_index");
        assert_eq!(search.get_i64("numCandidates").unwrap(), 10);
        assert_eq!(search.get_i64("limit").unwrap(), 3);
        assert_eq!(search.get_array("queryVector").unwrap().len(), 2);

        let project = pipeline[1].get_document("$project").unwrap();
        assert_eq!(project.get_i32("text").unwrap(), 1);
        assert_eq!(
            project
                .get_document("score")
                .unwrap()
                .get_str("$meta")
                .unwrap(),
            "vectorSearchScore"
        );
    }

    #[test]
    fn decodes_projected_documents() {
        let result = decode_result(&doc! { "text": "Policy P1", "score": 0.91 }).unwrap();
        assert_eq!(result, SearchResult::new("Policy P1", 0.91));

        let err = decode_result(&doc! { "score": 0.5 }).unwrap_err();
        assert!(matches!(err, SearchError::Malformed(_)));

        let err = decode_result(&doc! { "text": "Policy P2", "score": f64::NAN }).unwrap_err();
        assert!(matches!(err, SearchError::Malformed(_)));
    }

    #[tokio::test]
    async fn wrong_vector_length_fails_before_any_io() {
        let handle = Arc::new(MongoHandle::new(&DatabaseConfig::default()));
        let index = MongoVectorIndex::new(handle.clone(), settings());

        let err = index.search(&[0.1, 0.2, 0.3]).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "query vector has 3 dimensions, index expects 2"
        );
        assert!(!handle.is_connected());
    }

    #[tokio::test]
    async fn bad_uri_leaves_the_handle_unconnected() {
        let config = DatabaseConfig {
            uri: "not-a-mongodb-uri".to_string(),
            ..DatabaseConfig::default()
        };
        let handle = MongoHandle::new(&config);
        assert!(matches!(
            handle.connect_once().await,
            Err(SearchError::Unavailable(_))
        ));
        assert!(!handle.is_connected());
    }

    #[tokio::test]
    #[ignore]
    async fn live_connection_is_established_once() {
        let config = DatabaseConfig {
            uri: std::env::var("MONGO_URI").unwrap_or_default(),
            ..DatabaseConfig::default()
        };
        let handle = Arc::new(MongoHandle::new(&config));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let handle = handle.clone();
                tokio::spawn(async move { handle.connect_once().await.map(|db| db.name().to_string()) })
            })
            .collect();
        for task in tasks {
            assert_eq!(task.await.unwrap().unwrap(), "rag");
        }
        assert!(handle.is_connected());
    }
}
