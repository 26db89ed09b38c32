//! Route handlers
//!
//! Every handler looks up the caller's session from the cookie jar, locks it,
//! and runs the document operation on the blocking pool. Only an upload
//! registers a new session. Operations that end in a redirect report failures
//! as notices shown on the page the user lands on.

pub mod document;
pub mod edit;

use crate::error::ServerError;
use crate::state::{AppState, SharedSession};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use pdf_scan::{ArtifactStore, DocumentSession, NoticeLevel, ScanError, ScanOptions};
use std::sync::Arc;

const GENERIC_FAILURE: &str = "Something went wrong, please try again";

/// Run `op` against the locked session on the blocking pool
pub(crate) async fn with_session<T, F>(
    state: &Arc<AppState>,
    session: SharedSession,
    op: F,
) -> Result<T, ServerError>
where
    F: FnOnce(&mut DocumentSession, &dyn ArtifactStore, &ScanOptions) -> T + Send + 'static,
    T: Send + 'static,
{
    let mut guard = session.lock_owned().await;
    let store = state.store.clone();
    let options = state.options.clone();

    let value = tokio::task::spawn_blocking(move || op(&mut *guard, &*store, &*options)).await?;
    Ok(value)
}

/// Like [`with_session`] for operations that fail with a [`ScanError`]
pub(crate) async fn try_with_session<T, F>(
    state: &Arc<AppState>,
    session: SharedSession,
    op: F,
) -> Result<T, ServerError>
where
    F: FnOnce(&mut DocumentSession, &dyn ArtifactStore, &ScanOptions) -> pdf_scan::Result<T>
        + Send
        + 'static,
    T: Send + 'static,
{
    Ok(with_session(state, session, op).await??)
}

/// Queue a notice describing `err`. Internal failures are logged and shown
/// generically.
pub(crate) fn report(session: &mut DocumentSession, err: &ScanError) {
    if err.is_user_facing() {
        session.notify(NoticeLevel::Error, err.to_string());
    } else {
        log::error!("Document operation failed: {}", err);
        session.notify(NoticeLevel::Error, GENERIC_FAILURE);
    }
}

/// A PDF response; `disposition` is `inline` or `attachment`
pub(crate) fn pdf_response(disposition: &str, title: &str, bytes: Vec<u8>) -> Response {
    let content_disposition = format!("{}; filename=\"{}\"", disposition, title);
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, content_disposition),
            (header::CACHE_CONTROL, "no-store".to_string()),
        ],
        bytes,
    )
        .into_response()
}
