// CORS configuration for the upload form's origin

use axum::http::{header::CONTENT_TYPE, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use crate::config::ServerConfig;

pub fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let methods = [Method::GET, Method::POST];

    if config.cors_allowed_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers([CONTENT_TYPE]);
    }

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|e| warn!("Failed to parse origin '{}': {}", origin, e))
                .ok()
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers([CONTENT_TYPE])
}
