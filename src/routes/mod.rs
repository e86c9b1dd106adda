//! API Routes
//!
//! This module organizes all HTTP endpoints for the application:
//! - `/handle-photo-shopping` - Photo upload, answered with shopping results
//! - `/blobstore-upload-url` - Where the upload form should post to
//! - `/api/health` - Health checks

pub mod health;
pub mod photo_shopping;
pub mod upload_url;

use axum::{extract::DefaultBodyLimit, http::Request, Router};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{info, Level};
use uuid::Uuid;

use crate::middleware::cors_layer;
use crate::models::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let body_limit = state.config.server.max_upload_bytes;
    let cors = cors_layer(&state.config.server);

    Router::new()
        .merge(photo_shopping::router(state.clone()))
        .merge(health::router(state))
        .merge(upload_url::router())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http-request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %Uuid::new_v4(),
                    )
                })
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}
