//! Edit page: thumbnails, rename, page deletion and reordering

use super::{report, try_with_session, with_session};
use crate::error::ServerError;
use crate::state::AppState;
use axum::{
    Form, Json,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use pdf_scan::{
    ArtifactKind, DeleteOutcome, DocumentSummary, Notice, NoticeLevel,
    delete_pages as delete_document_pages, read_thumbnail, rename_title,
    reorder_pages as reorder_document_pages,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Serialize)]
pub struct EditResponse {
    /// Messages from the last edit, shown once
    pub notices: Vec<Notice>,
    pub document: DocumentSummary,
    /// One URL per page, in page order
    pub thumbnails: Vec<String>,
}

#[derive(Deserialize)]
pub struct RenameForm {
    pub pdf_name: String,
}

#[derive(Deserialize)]
pub struct ReorderForm {
    pub order: String,
}

/// Where to send the user after an edit
fn edit_target(has_document: bool) -> &'static str {
    if has_document { "/edit" } else { "/" }
}

/// Describe the document for editing.
///
/// Without a document the user is sent to the start page, which keeps the
/// queued notices for display there.
pub async fn edit(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Response, ServerError> {
    let session = state.sessions.existing(&jar);

    let body = with_session(&state, session, |session, _, _| match session.summary() {
        Some(document) => Some((session.take_notices(), document)),
        None => {
            session.notify(NoticeLevel::Error, "No PDF available");
            None
        }
    })
    .await?;

    let response = match body {
        Some((notices, document)) => {
            let thumbnails = (1..=document.page_count)
                .map(|page| format!("/thumbnails/{}", page))
                .collect();
            Json(EditResponse {
                notices,
                document,
                thumbnails,
            })
            .into_response()
        }
        None => Redirect::to("/").into_response(),
    };
    Ok(response)
}

/// Thumbnail of a 1-based page
pub async fn thumbnail(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(page): Path<usize>,
) -> Result<Response, ServerError> {
    let session = state.sessions.existing(&jar);

    let bytes = try_with_session(&state, session, move |session, store, _| {
        read_thumbnail(session, store, page)
    })
    .await?;

    let headers = [(header::CONTENT_TYPE, ArtifactKind::Thumbnail.mime_type())];
    Ok((headers, bytes).into_response())
}

pub async fn edit_pdf_name(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<RenameForm>,
) -> Result<Redirect, ServerError> {
    let session = state.sessions.existing(&jar);

    let target = with_session(&state, session, move |session, _, _| {
        if let Err(e) = rename_title(session, &form.pdf_name) {
            report(session, &e);
        }
        edit_target(session.document.is_some())
    })
    .await?;

    Ok(Redirect::to(target))
}

/// Delete the `-`-joined 1-based pages in the path
pub async fn delete_pages(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(pages): Path<String>,
) -> Result<Redirect, ServerError> {
    let session = state.sessions.existing(&jar);

    let target = with_session(&state, session, move |session, store, options| {
        match delete_document_pages(session, store, &pages, options) {
            Ok(DeleteOutcome::Remaining(count)) => {
                log::info!("Deleted pages {}, {} remaining", pages, count);
            }
            Ok(DeleteOutcome::DocumentRemoved) => {
                session.notify(NoticeLevel::Info, "All pages deleted, PDF removed.");
            }
            Err(e) => report(session, &e),
        }
        edit_target(session.document.is_some())
    })
    .await?;

    Ok(Redirect::to(target))
}

pub async fn reorder_pages(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<ReorderForm>,
) -> Result<Redirect, ServerError> {
    let session = state.sessions.existing(&jar);

    let target = with_session(&state, session, move |session, store, options| {
        if let Err(e) = reorder_document_pages(session, store, &form.order, options) {
            report(session, &e);
        }
        edit_target(session.document.is_some())
    })
    .await?;

    Ok(Redirect::to(target))
}
