//! Start page, upload, preview and download

use super::{pdf_response, report, try_with_session, with_session};
use crate::error::ServerError;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartError},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use pdf_scan::{
    DocumentSummary, Notice, NoticeLevel, PreviewOutcome, ScanError, SourceImage, create_document,
    delete_document, preview as preview_document, read_artifact, take_download,
};
use serde::Serialize;
use std::sync::Arc;

/// Form field carrying the uploaded images
const UPLOAD_FIELD: &str = "files";

#[derive(Serialize)]
pub struct IndexResponse {
    pub notices: Vec<Notice>,
    pub document: Option<DocumentSummary>,
}

#[derive(Serialize)]
pub struct PreviewResponse {
    pub document: DocumentSummary,
    pub view_url: &'static str,
    pub download_url: &'static str,
    pub edit_url: &'static str,
}

/// Drain notices and describe the current document
pub async fn index(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Json<IndexResponse>, ServerError> {
    let session = state.sessions.existing(&jar);

    let body = with_session(&state, session, |session, _, _| IndexResponse {
        notices: session.take_notices(),
        document: session.summary(),
    })
    .await?;

    Ok(Json(body))
}

/// Build a new document from the uploaded images
pub async fn create_pdf(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut multipart: Multipart,
) -> Result<Response, ServerError> {
    let mut uploads = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(invalid_upload)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.map_err(invalid_upload)?;

        // Browsers send an empty part when no file was picked
        if bytes.is_empty() {
            continue;
        }
        uploads.push(SourceImage {
            bytes: bytes.to_vec(),
            file_name,
        });
    }

    // Registered only once the request is known to be a well-formed upload
    let (jar, session) = state.sessions.resolve(jar);

    log::info!("Creating PDF from {} uploaded image(s)", uploads.len());
    let created = with_session(&state, session, move |session, store, options| {
        match create_document(session, store, &uploads, options) {
            Ok(()) => true,
            Err(e) => {
                report(session, &e);
                false
            }
        }
    })
    .await?;

    let target = if created { "/preview" } else { "/" };
    Ok((jar, Redirect::to(target)).into_response())
}

fn invalid_upload(e: MultipartError) -> ServerError {
    ServerError::InvalidRequest {
        message: e.body_text(),
    }
}

/// Show the document once; repeat visits remove it
pub async fn preview(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Response, ServerError> {
    let session = state.sessions.existing(&jar);

    let outcome = with_session(&state, session, |session, store, _| {
        match preview_document(session, store) {
            Ok(PreviewOutcome::Shown(summary)) => Some(summary),
            Ok(PreviewOutcome::Expired) => {
                session.notify(NoticeLevel::Info, "PDF removed after refresh.");
                None
            }
            Err(e) => {
                report(session, &e);
                None
            }
        }
    })
    .await?;

    let response = match outcome {
        Some(document) => Json(PreviewResponse {
            document,
            view_url: "/view_pdf",
            download_url: "/download_pdf",
            edit_url: "/edit",
        })
        .into_response(),
        None => Redirect::to("/").into_response(),
    };
    Ok(response)
}

/// Serve the PDF inline for an embedded viewer
pub async fn view_pdf(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Response, ServerError> {
    let session = state.sessions.existing(&jar);

    try_with_session(&state, session, |session, store, _| {
        let bytes = read_artifact(session, store)?;
        let title = session
            .document
            .as_ref()
            .map(|doc| doc.title.clone())
            .ok_or(ScanError::ArtifactMissing)?;
        Ok((title, bytes))
    })
    .await
    .map(|(title, bytes)| pdf_response("inline", &title, bytes))
}

/// Hand out the PDF as an attachment and clear the session
pub async fn download_pdf(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Response, ServerError> {
    let session = state.sessions.existing(&jar);

    let download = try_with_session(&state, session, |session, store, _| {
        take_download(session, store)
    })
    .await?;
    log::info!("Downloaded {} ({} bytes)", download.title, download.bytes.len());

    Ok(pdf_response("attachment", &download.title, download.bytes))
}

/// Remove the document and everything derived from it
pub async fn delete_pdf(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Redirect, ServerError> {
    let session = state.sessions.existing(&jar);

    with_session(&state, session, |session, store, _| {
        if delete_document(session, store) {
            session.notify(NoticeLevel::Info, "PDF deleted.");
        }
    })
    .await?;

    Ok(Redirect::to("/"))
}
