use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pdf_scan::ScanError;
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by handlers that do not redirect
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("{0}")]
    Scan(#[from] ScanError),

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<tokio::task::JoinError> for ServerError {
    fn from(e: tokio::task::JoinError) -> Self {
        ServerError::Internal {
            message: e.to_string(),
        }
    }
}

/// API error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Scan(ScanError::ArtifactMissing) => StatusCode::NOT_FOUND,
            ServerError::Scan(e) if e.is_user_facing() => StatusCode::BAD_REQUEST,
            ServerError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("Request failed: {}", self);
        }

        let body = ErrorResponse {
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
