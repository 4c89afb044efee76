//! Raster image decoding

use crate::document::{DocumentError, DocumentFormat, DocumentResult, PageImage};

/// Decode a single uploaded image strictly as the declared format.
///
/// Bytes that do not parse as that format are treated as a corrupt
/// document, not re-sniffed.
pub async fn decode_image(bytes: Vec<u8>, format: DocumentFormat) -> DocumentResult<Vec<PageImage>> {
    let image_format = format
        .image_format()
        .ok_or_else(|| DocumentError::UnsupportedFormat(format.as_str().to_string()))?;

    tokio::task::spawn_blocking(move || {
        let image = image::load_from_memory_with_format(&bytes, image_format).map_err(|e| {
            DocumentError::Corrupt(format!("Failed to decode {} image: {}", format.as_str(), e))
        })?;

        Ok(vec![PageImage { number: 1, image }])
    })
    .await
    .map_err(|e| DocumentError::Render(format!("Task join error: {}", e)))?
}
