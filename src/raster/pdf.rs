//! PDF page rendering via MuPDF

use image::{DynamicImage, RgbImage};
use mupdf::{Colorspace, Document, Matrix};

use crate::document::{DocumentError, DocumentResult, PageImage};

/// PDF user space units per inch
const PDF_POINTS_PER_INCH: f32 = 72.0;

/// Render every page of a PDF to an RGB image at the given DPI.
///
/// MuPDF handles are not `Send`, so the document is opened, rendered, and
/// dropped inside a single blocking task.
pub async fn render_pdf_pages(bytes: Vec<u8>, dpi: u32) -> DocumentResult<Vec<PageImage>> {
    if !bytes.starts_with(b"%PDF") {
        return Err(DocumentError::Corrupt(
            "missing PDF header".to_string(),
        ));
    }

    tokio::task::spawn_blocking(move || {
        let doc = Document::from_bytes(&bytes, "application/pdf")
            .map_err(|e| DocumentError::Corrupt(format!("Failed to open PDF: {}", e)))?;

        let page_count = doc
            .page_count()
            .map_err(|e| DocumentError::Corrupt(format!("Failed to read page count: {}", e)))?;
        if page_count == 0 {
            return Err(DocumentError::Corrupt("PDF has no pages".to_string()));
        }

        let scale = dpi as f32 / PDF_POINTS_PER_INCH;
        let matrix = Matrix::new_scale(scale, scale);
        let colorspace = Colorspace::device_rgb();

        let mut pages = Vec::with_capacity(page_count as usize);
        for index in 0..page_count {
            let page = doc.load_page(index).map_err(|e| {
                DocumentError::Render(format!("Failed to load page {}: {}", index + 1, e))
            })?;
            let pixmap = page.to_pixmap(&matrix, &colorspace, false, true).map_err(|e| {
                DocumentError::Render(format!("Failed to render page {}: {}", index + 1, e))
            })?;

            pages.push(PageImage {
                number: index as usize + 1,
                image: pixmap_to_image(&pixmap)?,
            });
        }

        Ok(pages)
    })
    .await
    .map_err(|e| DocumentError::Render(format!("Task join error: {}", e)))?
}

/// Copy MuPDF pixmap samples into an `image` RGB buffer
fn pixmap_to_image(pixmap: &mupdf::Pixmap) -> DocumentResult<DynamicImage> {
    let width = pixmap.width() as u32;
    let height = pixmap.height() as u32;
    let samples = pixmap.samples();
    let n = pixmap.n() as usize;

    let mut rgb_buffer = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height as usize {
        for x in 0..width as usize {
            let offset = (y * width as usize + x) * n;
            let r = samples.get(offset).copied().unwrap_or(0);
            let g = samples.get(offset + 1).copied().unwrap_or(0);
            let b = samples.get(offset + 2).copied().unwrap_or(0);
            rgb_buffer.extend_from_slice(&[r, g, b]);
        }
    }

    let img = RgbImage::from_raw(width, height, rgb_buffer)
        .ok_or_else(|| DocumentError::Render("Failed to create image buffer".to_string()))?;

    Ok(DynamicImage::ImageRgb8(img))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal single-page PDF that MuPDF can parse
    fn minimal_pdf() -> Vec<u8> {
        let pdf_content = b"%PDF-1.4
1 0 obj
<< /Type /Catalog /Pages 2 0 R >>
endobj
2 0 obj
<< /Type /Pages /Kids [3 0 R] /Count 1 >>
endobj
3 0 obj
<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R /Resources << >> >>
endobj
4 0 obj
<< /Length 0 >>
stream
endstream
endobj
xref
0 5
0000000000 65535 f
0000000009 00000 n
0000000058 00000 n
0000000115 00000 n
0000000226 00000 n
trailer
<< /Size 5 /Root 1 0 R >>
startxref
276
%%EOF";
        pdf_content.to_vec()
    }

    #[tokio::test]
    async fn renders_minimal_pdf_to_one_page() {
        let pages = render_pdf_pages(minimal_pdf(), 72).await.unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].number, 1);
        assert!(pages[0].image.width() > 0);
        assert!(pages[0].image.height() > 0);
    }

    #[tokio::test]
    async fn dpi_scales_output_dimensions() {
        let low = render_pdf_pages(minimal_pdf(), 72).await.unwrap();
        let high = render_pdf_pages(minimal_pdf(), 144).await.unwrap();
        assert!(high[0].image.width() > low[0].image.width());
        assert!(high[0].image.height() > low[0].image.height());
    }

    #[tokio::test]
    async fn rejects_bytes_without_pdf_header() {
        let err = render_pdf_pages(b"not a pdf at all".to_vec(), 72)
            .await
            .unwrap_err();
        assert!(matches!(err, DocumentError::Corrupt(_)));
    }

    #[tokio::test]
    async fn rejects_truncated_pdf() {
        let err = render_pdf_pages(b"%PDF-1.4\ngarbage".to_vec(), 72)
            .await
            .unwrap_err();
        assert!(matches!(err, DocumentError::Corrupt(_)));
    }
}
