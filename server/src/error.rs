use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::ErrorResponse;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Missing multipart field '{0}'")]
    MissingField(&'static str),

    #[error("Uploaded file has no usable filename")]
    MissingFilename,

    #[error("Malformed upload: {0}")]
    Multipart(#[from] MultipartError),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::MissingField(_) | ServerError::MissingFilename => StatusCode::BAD_REQUEST,
            ServerError::Multipart(e) => e.status(),
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::warn!("{}", self);
        }
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}
