//! Document Types
//!
//! Upload formats, rasterized pages, and the typed per-page OCR text.

use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// Supported upload formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Png,
    Jpeg,
    Tiff,
    Bmp,
    Webp,
}

impl DocumentFormat {
    /// Parse the `file_format` hint supplied alongside the upload
    pub fn from_hint(hint: &str) -> Option<Self> {
        match hint.trim().to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "tif" | "tiff" => Some(Self::Tiff),
            "bmp" => Some(Self::Bmp),
            "webp" => Some(Self::Webp),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Tiff => "tiff",
            Self::Bmp => "bmp",
            Self::Webp => "webp",
        }
    }

    /// The `image` crate format for raster inputs (None for PDF)
    pub fn image_format(&self) -> Option<image::ImageFormat> {
        match self {
            Self::Pdf => None,
            Self::Png => Some(image::ImageFormat::Png),
            Self::Jpeg => Some(image::ImageFormat::Jpeg),
            Self::Tiff => Some(image::ImageFormat::Tiff),
            Self::Bmp => Some(image::ImageFormat::Bmp),
            Self::Webp => Some(image::ImageFormat::WebP),
        }
    }
}

/// A single rasterized page (1-indexed)
#[derive(Debug, Clone)]
pub struct PageImage {
    pub number: usize,
    pub image: DynamicImage,
}

/// Recognized text for one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageText {
    pub number: usize,
    pub text: String,
}

/// Ordered per-page text for a whole document.
///
/// Always UTF-8; page boundaries stay explicit until the final
/// concatenation so downstream parsing can tell pages apart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RawText {
    pages: Vec<PageText>,
}

impl RawText {
    pub fn new(pages: Vec<PageText>) -> Self {
        Self { pages }
    }

    pub fn pages(&self) -> &[PageText] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Join page texts in page order with explicit boundary markers
    pub fn concatenated(&self) -> String {
        let blocks: Vec<String> = self
            .pages
            .iter()
            .map(|page| format!("===== PAGE {} =====\n{}\n", page.number, page.text))
            .collect();
        blocks.join("\n")
    }
}
