//! Document error types

use thiserror::Error;

/// Errors raised while turning an upload into page images
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The format hint names a type this service does not handle
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// The bytes could not be parsed as the declared format
    #[error("Corrupt document: {0}")]
    Corrupt(String),

    /// Rendering failed after the document was opened
    #[error("Render error: {0}")]
    Render(String),
}

/// Result type alias for document operations
pub type DocumentResult<T> = std::result::Result<T, DocumentError>;

impl DocumentError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Self::UnsupportedFormat(_) => StatusCode::BAD_REQUEST,
            Self::Corrupt(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
