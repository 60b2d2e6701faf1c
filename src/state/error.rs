use thiserror::Error;

use crate::llm::ProviderError;

#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("Failed to initialize LLM provider: {0}")]
    Provider(#[source] ProviderError),
}
