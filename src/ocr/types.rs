//! OCR Types
//!
//! Engine selection and error types for the recognition step.

use serde::{Deserialize, Serialize};

/// Which recognition backend to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrEngineKind {
    /// Tesseract CLI (local)
    Tesseract,
    /// Ollama vision model (local LLM)
    Ollama,
}

impl Default for OcrEngineKind {
    fn default() -> Self {
        Self::Tesseract
    }
}

impl OcrEngineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tesseract => "tesseract",
            Self::Ollama => "ollama",
        }
    }
}

/// OCR error types
#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("OCR engine not available: {0}")]
    EngineUnavailable(String),

    #[error("OCR processing failed: {0}")]
    Recognition(String),

    #[error("OCR timed out on page {page} after {seconds} seconds")]
    PageTimeout { page: usize, seconds: u64 },

    #[error("Image encoding failed: {0}")]
    ImageEncoding(String),
}

impl OcrError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Self::EngineUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::PageTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
