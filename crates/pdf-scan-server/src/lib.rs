//! HTTP front end for `pdf-scan`
//!
//! Serves one document per browser session, keyed by the `pdfscan_session`
//! cookie.

pub mod config;
pub mod error;
pub mod handlers;
pub mod logger;
pub mod state;

pub use config::ServerConfig;
pub use error::{ErrorResponse, ServerError};
pub use logger::StderrLogger;
pub use state::{AppState, SESSION_COOKIE, SessionRegistry};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use handlers::{document, edit};
use std::sync::Arc;

pub fn router(state: Arc<AppState>) -> Router {
    let body_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        .route("/", get(document::index))
        .route("/create_pdf", post(document::create_pdf))
        .route("/preview", get(document::preview))
        .route("/view_pdf", get(document::view_pdf))
        .route("/download_pdf", get(document::download_pdf))
        .route("/delete_pdf", post(document::delete_pdf))
        .route("/edit", get(edit::edit))
        .route("/thumbnails/{page}", get(edit::thumbnail))
        .route("/edit_pdf_name", post(edit::edit_pdf_name))
        .route("/delete_pages/{pages}", post(edit::delete_pages))
        .route("/reorder_pages", post(edit::reorder_pages))
        .layer(body_limit)
        .with_state(state)
}
