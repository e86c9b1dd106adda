use crate::classify::QueryClassifier;
use crate::config::Config;
use crate::search::ShoppingQuerier;
use crate::storage::BlobStore;
use std::sync::Arc;

/// Collaborators shared by every request, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub blob_store: Arc<dyn BlobStore>,
    pub classifier: Arc<dyn QueryClassifier>,
    pub shopping: Arc<dyn ShoppingQuerier>,
}

// API Request/Response types

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub blob_store: String,
}
