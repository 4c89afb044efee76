//! Application state management

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::ocr::{engine_from_config, OcrEngine, TextExtractor};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    pub config: Config,
    pub engine: Arc<dyn OcrEngine>,
}

impl AppState {
    /// Create application state with the engine named in the configuration.
    pub fn new(config: Config) -> Self {
        let engine = engine_from_config(&config.ocr);
        Self::with_engine(config, engine)
    }

    /// Create application state around an injected OCR engine.
    pub fn with_engine(config: Config, engine: Arc<dyn OcrEngine>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, engine }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the OCR engine
    pub fn engine(&self) -> &Arc<dyn OcrEngine> {
        &self.inner.engine
    }

    /// Build a page text extractor bound to the configured engine.
    pub fn text_extractor(&self) -> TextExtractor {
        TextExtractor::new(
            Arc::clone(&self.inner.engine),
            Duration::from_secs(self.inner.config.ocr.timeout_secs),
        )
    }
}
