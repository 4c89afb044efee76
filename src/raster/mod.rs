//! Document rasterization
//!
//! Turns an upload into ordered page images: PDFs render through MuPDF at a
//! fixed DPI, raster formats decode as the client declared them.

mod image;
mod pdf;

pub use self::image::decode_image;
pub use self::pdf::render_pdf_pages;

use crate::document::{DocumentFormat, DocumentResult, PageImage};

/// Rasterize an uploaded document into its page images
pub async fn rasterize(
    bytes: Vec<u8>,
    format: DocumentFormat,
    dpi: u32,
) -> DocumentResult<Vec<PageImage>> {
    match format {
        DocumentFormat::Pdf => render_pdf_pages(bytes, dpi).await,
        other => decode_image(bytes, other).await,
    }
}
