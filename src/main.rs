use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use photo_shopping::{
    classify::StubClassifier,
    config::Config,
    routes::create_router,
    search::SerpApiShoppingClient,
    storage::{BlobStore, InMemoryBlobStore, S3BlobStore},
    utils::init_logger,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing; the guard flushes file logs on shutdown
    let _log_guard = init_logger(&config.logging)?;
    info!("Configuration loaded: {:?}", config.server);

    let blob_store: Arc<dyn BlobStore> = match config.storage.provider.as_str() {
        "s3" => Arc::new(S3BlobStore::new(&config.storage)?),
        "memory" => Arc::new(InMemoryBlobStore::new()),
        other => anyhow::bail!("Unsupported STORAGE_PROVIDER: {}", other),
    };
    info!(provider = blob_store.name(), "Blob store ready");

    // Create shared state
    let state = AppState {
        shopping: Arc::new(SerpApiShoppingClient::from_config(&config.shopping)),
        classifier: Arc::new(StubClassifier),
        blob_store,
        config: config.clone(),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let listener = TcpListener::bind(config.bind_address()).await?;
    info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
