pub mod error;
pub mod ollama;
pub mod openai;
pub mod provider;
pub mod types;


use std::sync::Arc;

use crate::core::config::{ProviderConfig, ProviderKind};

pub use error::ProviderError;
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;
pub use provider::LlmProvider;
pub use types::{ChatMessage, Prompt};

/// Build the single provider used for the lifetime of the process.
pub fn build_provider(config: &ProviderConfig) -> Result<Arc<dyn LlmProvider>, ProviderError> {
    let provider: Arc<dyn LlmProvider> = match config.kind {
        ProviderKind::OpenAi => Arc::new(OpenAiProvider::new(
            &config.openai,
            config.dimensions,
            config.timeout_secs,
        )?),
        ProviderKind::Ollama => Arc::new(OllamaProvider::new(
            &config.ollama,
            config.dimensions,
            config.timeout_secs,
        )?),
    };
    tracing::info!(
        "Using {} provider ({} dimensions)",
        provider.name(),
        provider.dimensions()
    );
    Ok(provider)
}
