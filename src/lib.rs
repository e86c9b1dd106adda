// Photo Shopping - upload a photo, get back matching shopping results

pub mod config;
pub mod models;
pub mod types;
pub mod classify;  // Photo to shopping query (stubbed detection)
pub mod search;    // Shopping search (SerpAPI Google Shopping)
pub mod storage;   // Blob storage (in-memory or S3)
pub mod routes;
pub mod middleware;
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
