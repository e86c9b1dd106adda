//! `GET /blobstore-upload-url`
//!
//! The web form asks for its upload target before it is shown. Uploads are
//! intercepted by the photo shopping handler itself, so the target is always
//! that handler's path.

use axum::{routing::get, Router};

use super::photo_shopping::UPLOAD_PATH;

pub fn router() -> Router {
    Router::new().route("/blobstore-upload-url", get(upload_url))
}

async fn upload_url() -> &'static str {
    UPLOAD_PATH
}
