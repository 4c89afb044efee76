//! OCR engine clients and per-page text extraction
//!
//! Engines implement the [`OcrEngine`] trait so the extraction pipeline and
//! the tests can swap implementations. Shipping engines: the Tesseract CLI
//! and an Ollama vision model.

mod engine;
mod extractor;
mod preprocess;
mod types;

pub use engine::{engine_from_config, OcrEngine, OllamaEngine, TesseractEngine};
pub use extractor::TextExtractor;
pub use preprocess::{binarize, prepare_page};
pub use types::{OcrEngineKind, OcrError};
