use super::{
    ContextConfig, DatabaseConfig, LoggingConfig, OllamaConfig, OpenAiConfig, ProviderConfig,
    ProviderKind, ServerConfig, VectorSearchConfig,
};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATABASE: &str = "rag";
pub const DEFAULT_COLLECTION: &str = "insurance_embeddings";
pub const DEFAULT_VECTOR_INDEX: &str = "insurance_vector_index";
pub const DEFAULT_EMBEDDING_PATH: &str = "embedding";
pub const DEFAULT_NUM_CANDIDATES: u32 = 10;
pub const DEFAULT_LIMIT: u32 = 3;
pub const DEFAULT_DIMENSIONS: usize = 512;

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            uri: String::new(),
            name: DEFAULT_DATABASE.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }
}

impl Default for VectorSearchConfig {
    fn default() -> Self {
        Self {
            index: DEFAULT_VECTOR_INDEX.to_string(),
            path: DEFAULT_EMBEDDING_PATH.to_string(),
            num_candidates: DEFAULT_NUM_CANDIDATES,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Default for ProviderKind {
    fn default() -> Self {
        ProviderKind::OpenAi
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            dimensions: DEFAULT_DIMENSIONS,
            timeout_secs: 60,
            openai: OpenAiConfig::default(),
            ollama: OllamaConfig::default(),
        }
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            chat_model: "gpt-4o-mini".to_string(),
        }
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            embedding_model: "nomic-embed-text".to_string(),
            chat_model: "llama3.1".to_string(),
        }
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            separator: "\n\n".to_string(),
            max_context_chars: 12_000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            dir: None,
        }
    }
}
