use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use super::validation::validate_config;
use super::{AppConfig, ConfigError, ProviderKind};

const REDACT_PLACEHOLDER: &str = "****";

const SENSITIVE_PATTERNS: [&str; 6] = ["api_key", "secret", "password", "_token", "uri", "credential"];

#[derive(Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `$RAG_CONFIG_PATH`, falling back to `config.yml` in the working directory.
    pub fn from_env() -> Self {
        let path = env::var("RAG_CONFIG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.yml"));
        Self::new(path)
    }

    pub fn config_path(&self) -> &Path {
        &self.path
    }

    /// Load the file, apply environment overrides, then validate.
    pub fn load_config(&self) -> Result<AppConfig, ConfigError> {
        let mut config = load_yaml_file(&self.path)?;
        apply_env_overrides(&mut config, |key| env::var(key).ok())?;
        validate_config(&config)?;
        Ok(config)
    }

    pub fn redact_sensitive_values(&self, config: &AppConfig) -> Value {
        match serde_json::to_value(config) {
            Ok(value) => redact_sensitive_values(&value),
            Err(_) => Value::Null,
        }
    }
}

fn load_yaml_file(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!("No config file at {}; using defaults", path.display());
        return Ok(AppConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    if contents.trim().is_empty() {
        return Ok(AppConfig::default());
    }

    serde_yaml::from_str::<AppConfig>(&contents).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

pub(crate) fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(port) = get("PORT") {
        config.server.port = port.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
            path: "PORT".to_string(),
            reason: format!("'{}' is not a valid port", port),
        })?;
    }
    if let Some(host) = get("HOST") {
        config.server.host = host;
    }
    if let Some(uri) = get("MONGO_URI") {
        config.database.uri = uri;
    }
    if let Some(kind) = get("RAG_PROVIDER") {
        config.provider.kind = kind.parse::<ProviderKind>()?;
    }
    if let Some(api_key) = get("OPENAI_API_KEY") {
        config.provider.openai.api_key = Some(api_key);
    }
    if let Some(base_url) = get("OPENAI_BASE_URL") {
        config.provider.openai.base_url = base_url;
    }
    if let Some(base_url) = get("OLLAMA_BASE_URL") {
        config.provider.ollama.base_url = base_url;
    }
    if let Some(dir) = get("RAG_LOG_DIR") {
        config.logging.dir = Some(dir);
    }
    Ok(())
}

fn redact_sensitive_values(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut redacted = Map::new();
            for (key, val) in map {
                if is_sensitive_key(key) && !val.is_null() {
                    redacted.insert(key.clone(), Value::String(REDACT_PLACEHOLDER.to_string()));
                } else {
                    redacted.insert(key.clone(), redact_sensitive_values(val));
                }
            }
            Value::Object(redacted)
        }
        Value::Array(items) => Value::Array(items.iter().map(redact_sensitive_values).collect()),
        _ => value.clone(),
    }
}

fn is_sensitive_key(key: &str) -> bool {
    let key_lower = key.to_lowercase();
    SENSITIVE_PATTERNS
        .iter()
        .any(|pattern| key_lower.contains(pattern))
}
