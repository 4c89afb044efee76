//! Per-page text extraction
//!
//! Drives the injected OCR engine over rasterized pages in page order and
//! assembles the typed per-page text.

use std::sync::Arc;
use std::time::Duration;

use crate::document::{PageImage, PageText, RawText};

use super::engine::OcrEngine;
use super::preprocess;
use super::types::OcrError;

/// Runs the OCR engine over rasterized pages
pub struct TextExtractor {
    engine: Arc<dyn OcrEngine>,
    page_timeout: Duration,
}

impl TextExtractor {
    pub fn new(engine: Arc<dyn OcrEngine>, page_timeout: Duration) -> Self {
        Self {
            engine,
            page_timeout,
        }
    }

    /// OCR every page, sequentially, in page order.
    ///
    /// The engine is probed once up front so a missing engine fails before
    /// any page work. The first page failure aborts the whole request; no
    /// retry.
    pub async fn extract(&self, pages: Vec<PageImage>) -> Result<RawText, OcrError> {
        if !self.engine.is_available().await {
            return Err(OcrError::EngineUnavailable(format!(
                "{} did not respond to an availability probe",
                self.engine.kind().as_str()
            )));
        }

        let mut texts = Vec::with_capacity(pages.len());
        for page in pages {
            let number = page.number;

            let png = tokio::task::spawn_blocking(move || preprocess::prepare_page(&page.image))
                .await
                .map_err(|e| OcrError::Recognition(format!("Task join error: {}", e)))??;

            let recognized = tokio::time::timeout(
                self.page_timeout,
                self.engine.recognize(&png, None),
            )
            .await
            .map_err(|_| OcrError::PageTimeout {
                page: number,
                seconds: self.page_timeout.as_secs(),
            })??;

            tracing::debug!(page = number, chars = recognized.len(), "Recognized page");

            texts.push(PageText {
                number,
                text: recognized,
            });
        }

        Ok(RawText::new(texts))
    }
}
