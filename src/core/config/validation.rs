use super::{AppConfig, ConfigError, ProviderKind};

pub fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    validate_required_string("database.uri", &config.database.uri)?;
    validate_required_string("database.name", &config.database.name)?;
    validate_required_string("database.collection", &config.database.collection)?;

    let search = &config.vector_search;
    validate_required_string("vector_search.index", &search.index)?;
    validate_required_string("vector_search.path", &search.path)?;
    validate_range("vector_search.limit", search.limit as u64, 1, 10_000)?;
    if search.num_candidates < search.limit {
        return Err(invalid(
            "vector_search.num_candidates",
            format!(
                "must be at least vector_search.limit ({}), got {}",
                search.limit, search.num_candidates
            ),
        ));
    }
    validate_range(
        "vector_search.num_candidates",
        search.num_candidates as u64,
        1,
        10_000,
    )?;

    let provider = &config.provider;
    validate_range("provider.dimensions", provider.dimensions as u64, 1, 65_536)?;
    validate_range("provider.timeout_secs", provider.timeout_secs, 1, 3_600)?;
    match provider.kind {
        ProviderKind::OpenAi => {
            let key = provider.openai.api_key.as_deref().unwrap_or_default();
            validate_required_string("provider.openai.api_key", key)?;
            validate_required_string("provider.openai.base_url", &provider.openai.base_url)?;
            validate_required_string(
                "provider.openai.embedding_model",
                &provider.openai.embedding_model,
            )?;
            validate_required_string("provider.openai.chat_model", &provider.openai.chat_model)?;
        }
        ProviderKind::Ollama => {
            validate_required_string("provider.ollama.base_url", &provider.ollama.base_url)?;
            validate_required_string(
                "provider.ollama.embedding_model",
                &provider.ollama.embedding_model,
            )?;
            validate_required_string("provider.ollama.chat_model", &provider.ollama.chat_model)?;
        }
    }

    for (index, origin) in config.server.cors_allowed_origins.iter().enumerate() {
        validate_required_string(&format!("server.cors_allowed_origins[{}]", index), origin)?;
    }

    Ok(())
}

fn validate_required_string(path: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(invalid(path, "value cannot be empty"));
    }
    Ok(())
}

fn validate_range(path: &str, value: u64, min: u64, max: u64) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(invalid(
            path,
            format!("must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

fn invalid(path: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        path: path.to_string(),
        reason: reason.into(),
    }
}
