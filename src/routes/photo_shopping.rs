//! `POST /handle-photo-shopping`
//!
//! Receives the photo upload form and answers with the shopping query that
//! was derived from the photo plus the matching products:
//!
//! ```text
//! ["Fountain pen",[{"title":"...","imageLink":"...",...}]]
//! ```

use axum::{
    extract::{Multipart, State},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::models::AppState;
use crate::search::ShoppingQueryInput;
use crate::storage::{discard_uploads, extract_upload, read_all, BlobStore, UploadSet};
use crate::types::{AppError, AppResult};

pub const UPLOAD_PATH: &str = "/handle-photo-shopping";
pub const PHOTO_FIELD: &str = "photo";
pub const CATEGORY_FIELD: &str = "photo-category";

const JSON_CONTENT_TYPE: &str = "application/json";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(UPLOAD_PATH, post(handle_photo_shopping))
        .with_state(state)
}

/// A parsed upload form: stored file parts plus plain text fields.
#[derive(Debug, Default)]
pub struct FormSubmission {
    pub uploads: UploadSet,
    pub fields: HashMap<String, String>,
}

/// Store every file part of the form in the blob store.
///
/// Empty file parts are stored too; the upload validator decides what to do
/// with them. If the form cannot be read to the end, the blobs stored so far
/// are deleted again.
pub async fn intercept_uploads(
    mut multipart: Multipart,
    store: &dyn BlobStore,
) -> AppResult<FormSubmission> {
    let mut submission = FormSubmission::default();

    if let Err(e) = read_form(&mut multipart, store, &mut submission).await {
        discard_uploads(store, &submission.uploads).await;
        return Err(e);
    }

    Ok(submission)
}

async fn read_form(
    multipart: &mut Multipart,
    store: &dyn BlobStore,
    submission: &mut FormSubmission,
) -> AppResult<()> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidRequest(format!("Invalid multipart data: {}", e)))?
    {
        let name = match field.name() {
            Some(name) => name.to_string(),
            None => continue,
        };

        if field.file_name().is_some() {
            let content_type = field
                .content_type()
                .unwrap_or(mime::APPLICATION_OCTET_STREAM.essence_str())
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::InvalidRequest(format!("Failed to read file: {}", e)))?;
            let key = store.put(data, &content_type).await?;
            submission.uploads.insert(name, key);
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::InvalidRequest(format!("Failed to read field: {}", e)))?;
            // A repeated text field keeps its first value.
            submission.fields.entry(name).or_insert(value);
        }
    }

    Ok(())
}

/// Render `[<query>,<results>]` with each half encoded on its own.
pub fn compose<T: Serialize>(query: &str, results: &[T]) -> Result<Vec<u8>, serde_json::Error> {
    let query_json = serde_json::to_string(query)?;
    let results_json = serde_json::to_string(results)?;
    Ok(format!("[{},{}]", query_json, results_json).into_bytes())
}

pub async fn handle_photo_shopping(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Response> {
    let store = state.blob_store.as_ref();
    let submission = intercept_uploads(multipart, store).await?;

    let result = shop_for_photo(&state, &submission).await;

    // Uploaded blobs only live for the duration of the request.
    discard_uploads(store, &submission.uploads).await;
    result
}

async fn shop_for_photo(state: &AppState, submission: &FormSubmission) -> AppResult<Response> {
    let store = state.blob_store.as_ref();

    let key = extract_upload(store, &submission.uploads, PHOTO_FIELD)
        .await?
        .ok_or(AppError::MissingUpload)?;

    let category = submission
        .fields
        .get(CATEGORY_FIELD)
        .map(String::as_str)
        .unwrap_or_default();
    if category.is_empty() {
        return Err(AppError::MissingCategory);
    }

    let image = read_all(store, &key, state.config.storage.fetch_page_size).await?;
    debug!(key = %key, size = image.len(), category, "Photo loaded");

    let query = state.classifier.classify(category, &image).await?;

    let input = ShoppingQueryInput::builder(query.as_str())
        .language(state.config.shopping.language.as_str())
        .max_results(state.config.shopping.max_results)
        .build()?;
    let products = state.shopping.query(&input).await?;

    info!(query = %query, results = products.len(), "Photo shopping request served");

    let body = compose(&query, &products)?;
    Ok(([(CONTENT_TYPE, JSON_CONTENT_TYPE)], body).into_response())
}
