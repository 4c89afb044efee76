//! Configuration management for the Receta server

use serde::Deserialize;
use std::env;

use crate::ocr::OcrEngineKind;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub ocr: OcrConfig,
    pub raster: RasterConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    pub engine: OcrEngineKind,
    pub tesseract_path: String,
    pub language: String,
    pub timeout_secs: u64,
    pub ollama_url: String,
    pub ollama_model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RasterConfig {
    pub dpi: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
                max_upload_bytes: 50 * 1024 * 1024,
            },
            ocr: OcrConfig {
                engine: OcrEngineKind::Tesseract,
                tesseract_path: "tesseract".to_string(),
                language: "eng".to_string(),
                timeout_secs: 30,
                ollama_url: "http://localhost:11434".to_string(),
                ollama_model: "llava".to_string(),
            },
            raster: RasterConfig { dpi: 300 },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("SERVER_PORT")
                    .unwrap_or_else(|_| "8000".to_string())
                    .parse()
                    .unwrap_or(8000),
                max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                    .unwrap_or_else(|_| (50 * 1024 * 1024).to_string())
                    .parse()
                    .unwrap_or(50 * 1024 * 1024),
            },
            ocr: OcrConfig {
                engine: match env::var("OCR_ENGINE").unwrap_or_else(|_| "tesseract".to_string()).as_str() {
                    "ollama" => OcrEngineKind::Ollama,
                    _ => OcrEngineKind::Tesseract,
                },
                tesseract_path: env::var("TESSERACT_PATH")
                    .unwrap_or_else(|_| "tesseract".to_string()),
                language: env::var("OCR_LANGUAGE").unwrap_or_else(|_| "eng".to_string()),
                timeout_secs: env::var("OCR_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .unwrap_or(30),
                ollama_url: env::var("OLLAMA_URL")
                    .unwrap_or_else(|_| "http://localhost:11434".to_string()),
                ollama_model: env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llava".to_string()),
            },
            raster: RasterConfig {
                dpi: env::var("RASTER_DPI")
                    .unwrap_or_else(|_| "300".to_string())
                    .parse()
                    .unwrap_or(300),
            },
        })
    }
}
