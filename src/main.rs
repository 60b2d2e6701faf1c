use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;

use rag_chat::core::config::ConfigService;
use rag_chat::core::logging;
use rag_chat::server::router::router;
use rag_chat::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_service = ConfigService::from_env();
    let config = config_service
        .load_config()
        .with_context(|| format!("Failed to load {}", config_service.config_path().display()))?;
    logging::init(&config.logging);

    tracing::info!(
        "Effective configuration: {}",
        config_service.redact_sensitive_values(&config)
    );

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::from_config(config)?;

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    let addr = listener.local_addr()?;
    tracing::info!("Server running on {}", addr);

    let app: Router = router(state);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
