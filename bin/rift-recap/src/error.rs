use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Anything that can fail while serving a request. Every variant collapses
/// to the same `{"error": ...}` body at the boundary; only the status code
/// differs by class.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Riot(#[from] rift_recap_riot::Error),
    #[error(transparent)]
    Store(#[from] rift_recap_db::Error),
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            // The two upstream statuses a caller can act on pass through.
            Error::Riot(rift_recap_riot::Error::Upstream { status: 404, .. }) => {
                StatusCode::NOT_FOUND
            }
            Error::Riot(rift_recap_riot::Error::Upstream { status: 429, .. }) => {
                StatusCode::TOO_MANY_REQUESTS
            }
            Error::Riot(_) => StatusCode::BAD_GATEWAY,
            Error::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        error!("Request failed: {self}");
        (self.status_code(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
