use std::sync::Arc;

use crate::core::config::AppConfig;
use crate::llm::{build_provider, LlmProvider};
use crate::rag::{MongoHandle, MongoVectorIndex, RagPipeline, SearchSettings, VectorIndex};

pub mod error;

use error::InitializationError;

/// Shared application state handed to every route.
///
/// The database connection inside `mongo` is not opened here; the first
/// search request establishes it.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub provider: Arc<dyn LlmProvider>,
    pub pipeline: Arc<RagPipeline>,
    pub mongo: Arc<MongoHandle>,
}

impl AppState {
    /// Build the provider and the lazily connected index from a validated
    /// configuration.
    pub fn from_config(config: AppConfig) -> Result<Arc<Self>, InitializationError> {
        let provider = build_provider(&config.provider).map_err(InitializationError::Provider)?;

        let mongo = Arc::new(MongoHandle::new(&config.database));
        let settings = SearchSettings::from_config(
            &config.database,
            &config.vector_search,
            config.provider.dimensions,
        );
        let index: Arc<dyn VectorIndex> = Arc::new(MongoVectorIndex::new(mongo.clone(), settings));

        Ok(Self::from_parts(config, provider, index, mongo))
    }

    /// Assemble state from already-built parts.
    pub fn from_parts(
        config: AppConfig,
        provider: Arc<dyn LlmProvider>,
        index: Arc<dyn VectorIndex>,
        mongo: Arc<MongoHandle>,
    ) -> Arc<Self> {
        let pipeline = Arc::new(RagPipeline::new(provider.clone(), index, &config.context));
        Arc::new(Self {
            config: Arc::new(config),
            provider,
            pipeline,
            mongo,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ProviderKind;

    #[test]
    fn builds_without_touching_the_database() {
        let mut config = AppConfig::default();
        config.provider.kind = ProviderKind::Ollama;
        config.database.uri = "mongodb://127.0.0.1:1".to_string();

        let state = AppState::from_config(config).unwrap();

        assert_eq!(state.provider.name(), "ollama");
        assert!(!state.mongo.is_connected());
    }
}
