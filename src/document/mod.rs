//! Document abstraction
//!
//! Shared types for the upload-to-text pipeline: declared formats,
//! rasterized pages, and the typed per-page OCR output.

mod error;
mod types;

pub use error::{DocumentError, DocumentResult};
pub use types::{DocumentFormat, PageImage, PageText, RawText};
