//! Error types for the Receta server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::document::DocumentError;
use crate::ocr::OcrError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, ApiError>;

/// Application error type
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Document(#[from] DocumentError),

    #[error("{0}")]
    Ocr(#[from] OcrError),

    #[error("Invalid multipart upload: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("Missing multipart field: {0}")]
    MissingField(&'static str),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Document(e) => e.status_code(),
            Self::Ocr(e) => e.status_code(),
            Self::Multipart(_) | Self::MissingField(_) => StatusCode::BAD_REQUEST,
        }
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Rejected request: {}", self);
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_errors_map_to_client_status() {
        let err = ApiError::from(DocumentError::UnsupportedFormat("docx".to_string()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = ApiError::from(DocumentError::Corrupt("bad magic".to_string()));
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn ocr_errors_map_to_server_status() {
        let err = ApiError::from(OcrError::EngineUnavailable("tesseract".to_string()));
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let err = ApiError::from(OcrError::PageTimeout { page: 1, seconds: 30 });
        assert_eq!(err.status_code(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn missing_field_is_a_client_error() {
        assert_eq!(
            ApiError::MissingField("file").status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
