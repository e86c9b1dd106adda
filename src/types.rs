// Error type shared by the HTTP handlers

use crate::classify::ClassifyError;
use crate::search::ShoppingError;
use crate::storage::StorageError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Missing input image file.")]
    MissingUpload,

    #[error("Missing photo category.")]
    MissingCategory,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    InvalidCategory(#[from] ClassifyError),

    #[error(transparent)]
    Query(#[from] ShoppingError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Failed to encode response: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingUpload | AppError::MissingCategory | AppError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            // A category outside the fixed set is reported as a server error.
            AppError::InvalidCategory(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Query(_) | AppError::Storage(_) | AppError::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            error!(status = status.as_u16(), error = %message, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %message, "Request rejected");
        }

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;
