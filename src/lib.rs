//! Receta Server Library
//!
//! This crate exposes the extraction pipeline for the server binary,
//! integration tests, and benchmarks. The server binary is in main.rs.
//!
//! # Modules
//!
//! - `document`: document formats, errors, and typed page text
//! - `raster`: PDF page rendering and image decoding
//! - `ocr`: OCR engine clients and per-page text extraction
//! - `extract`: field matchers for patient reports and prescriptions
//! - `routes`: HTTP endpoints

pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod ocr;
pub mod raster;
pub mod routes;
pub mod state;

pub use config::Config;
pub use state::AppState;
