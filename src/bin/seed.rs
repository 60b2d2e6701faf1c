//! Embeds the insurance records in a JSON file and inserts them into the
//! configured collection.
//!
//! Usage: `seed [path/to/insurance_data.json]`

use std::env;
use std::fs;
use std::sync::Arc;

use anyhow::Context;

use rag_chat::core::config::ConfigService;
use rag_chat::core::logging;
use rag_chat::llm::build_provider;
use rag_chat::rag::{parse_records, Ingestor, MongoHandle, MongoVectorIndex, SearchSettings};

const DEFAULT_DATA_PATH: &str = "./seed/insurance_data.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigService::from_env().load_config()?;
    logging::init(&config.logging);

    let data_path = env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DATA_PATH.to_string());
    let raw = fs::read_to_string(&data_path)
        .with_context(|| format!("Failed to read {}", data_path))?;
    let records = parse_records(&raw).with_context(|| format!("Failed to parse {}", data_path))?;
    tracing::info!("Loaded {} records from {}", records.len(), data_path);

    let provider = build_provider(&config.provider)?;
    let documents = Ingestor::new(provider).run(&records).await?;

    let mongo = Arc::new(MongoHandle::new(&config.database));
    let settings = SearchSettings::from_config(
        &config.database,
        &config.vector_search,
        config.provider.dimensions,
    );
    let index = MongoVectorIndex::new(mongo, settings);
    let inserted = index.insert_documents(&documents).await?;

    tracing::info!(
        "Inserted {} documents into '{}'",
        inserted,
        index.settings().collection
    );
    Ok(())
}
