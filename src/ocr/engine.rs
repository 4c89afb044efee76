//! OCR Engines
//!
//! Defines the engine trait and clients for the supported recognition
//! backends. Engines are constructed once from configuration and injected
//! into the text extractor.

use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::Command;
use uuid::Uuid;

use crate::config::OcrConfig;

use super::types::{OcrEngineKind, OcrError};

/// OCR engine client
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Which backend this engine runs
    fn kind(&self) -> OcrEngineKind;

    /// Check if the engine can take requests
    async fn is_available(&self) -> bool;

    /// Recognize text in a PNG-encoded page image
    async fn recognize(
        &self,
        image_data: &[u8],
        language: Option<&str>,
    ) -> Result<String, OcrError>;
}

/// Build the engine the configuration selects
pub fn engine_from_config(config: &OcrConfig) -> Arc<dyn OcrEngine> {
    match config.engine {
        OcrEngineKind::Tesseract => Arc::new(TesseractEngine::new(
            &config.tesseract_path,
            &config.language,
        )),
        OcrEngineKind::Ollama => {
            Arc::new(OllamaEngine::new(&config.ollama_url, &config.ollama_model))
        }
    }
}

/// Tesseract CLI engine
pub struct TesseractEngine {
    binary_path: String,
    /// Default language passed as `-l` when the caller gives none
    default_language: String,
}

impl TesseractEngine {
    pub fn new(binary_path: &str, default_language: &str) -> Self {
        Self {
            binary_path: binary_path.to_string(),
            default_language: default_language.to_string(),
        }
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    fn kind(&self) -> OcrEngineKind {
        OcrEngineKind::Tesseract
    }

    async fn is_available(&self) -> bool {
        Command::new(&self.binary_path)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|status| status.success())
            .unwrap_or(false)
    }

    async fn recognize(
        &self,
        image_data: &[u8],
        language: Option<&str>,
    ) -> Result<String, OcrError> {
        let lang = language.unwrap_or(&self.default_language);

        // Tesseract reads from a file; give it a uuid-named temp image
        let input_path = std::env::temp_dir().join(format!("ocr_page_{}.png", Uuid::new_v4()));
        tokio::fs::write(&input_path, image_data)
            .await
            .map_err(|e| OcrError::Recognition(format!("Failed to write temp file: {}", e)))?;

        // `stdout` as the output base makes tesseract print to stdout
        let output = Command::new(&self.binary_path)
            .arg(&input_path)
            .arg("stdout")
            .arg("-l")
            .arg(lang)
            .arg("--oem")
            .arg("3")
            .arg("--psm")
            .arg("6")
            .output()
            .await;

        // Clean up input file
        let _ = tokio::fs::remove_file(&input_path).await;

        let output = output.map_err(|e| {
            OcrError::EngineUnavailable(format!("Failed to run {}: {}", self.binary_path, e))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Recognition(format!(
                "Tesseract failed: {}",
                stderr
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// Ollama vision model engine
pub struct OllamaEngine {
    /// Ollama API URL
    base_url: String,
    /// Model name (e.g., "llava", "bakllava")
    model: String,
    client: reqwest::Client,
}

impl OllamaEngine {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl OcrEngine for OllamaEngine {
    fn kind(&self) -> OcrEngineKind {
        OcrEngineKind::Ollama
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);

        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn recognize(
        &self,
        image_data: &[u8],
        language: Option<&str>,
    ) -> Result<String, OcrError> {
        use base64::Engine;

        let url = format!("{}/api/generate", self.base_url);
        let image_base64 = base64::engine::general_purpose::STANDARD.encode(image_data);

        let lang_hint = language
            .map(|l| format!(" The text is in {}.", l))
            .unwrap_or_default();
        let prompt = format!(
            "Extract all text from this image exactly as written.{} Return only the extracted text, nothing else.",
            lang_hint
        );

        let request = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "images": [image_base64],
            "stream": false
        });

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| OcrError::EngineUnavailable(format!("Failed to call Ollama: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(OcrError::Recognition(format!(
                "Ollama returned {}: {}",
                status, body
            )));
        }

        let result: serde_json::Value = response
            .json()
            .await
            .map_err(|e| OcrError::Recognition(format!("Failed to parse response: {}", e)))?;

        Ok(result["response"].as_str().unwrap_or("").trim().to_string())
    }
}

/// Mock engine for testing
#[cfg(test)]
pub struct MockEngine {
    pub text: String,
    pub available: bool,
    pub delay: Option<std::time::Duration>,
}

#[cfg(test)]
impl MockEngine {
    pub fn returning(text: &str) -> Self {
        Self {
            text: text.to_string(),
            available: true,
            delay: None,
        }
    }
}

#[cfg(test)]
#[async_trait]
impl OcrEngine for MockEngine {
    fn kind(&self) -> OcrEngineKind {
        OcrEngineKind::Tesseract
    }

    async fn is_available(&self) -> bool {
        self.available
    }

    async fn recognize(
        &self,
        _image_data: &[u8],
        _language: Option<&str>,
    ) -> Result<String, OcrError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_binary_is_not_available() {
        let engine = TesseractEngine::new("/nonexistent/path/to/tesseract", "eng");
        assert!(!engine.is_available().await);
    }

    #[tokio::test]
    async fn missing_binary_maps_to_engine_unavailable() {
        let engine = TesseractEngine::new("/nonexistent/path/to/tesseract", "eng");
        let err = engine.recognize(b"png bytes", None).await.unwrap_err();
        assert!(matches!(err, OcrError::EngineUnavailable(_)));
    }
}
