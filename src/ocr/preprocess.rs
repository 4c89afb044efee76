//! Page image preprocessing
//!
//! Scanned prescriptions OCR noticeably better as clean black-and-white
//! input, so every page goes through grayscale conversion and a global
//! Otsu threshold before reaching the engine.

use std::io::Cursor;

use image::{DynamicImage, GrayImage};

use super::types::OcrError;

/// Grayscale a page and binarize it against an Otsu threshold
pub fn binarize(image: &DynamicImage) -> GrayImage {
    let mut gray = image.to_luma8();
    let threshold = otsu_threshold(&gray);
    for pixel in gray.pixels_mut() {
        pixel.0[0] = if pixel.0[0] > threshold { 255 } else { 0 };
    }
    gray
}

/// Preprocess a page and encode it as PNG for the engine
pub fn prepare_page(image: &DynamicImage) -> Result<Vec<u8>, OcrError> {
    let binary = binarize(image);

    let mut png = Vec::new();
    DynamicImage::ImageLuma8(binary)
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| OcrError::ImageEncoding(e.to_string()))?;

    Ok(png)
}

/// Pick the luminance cutoff that maximizes between-class variance
fn otsu_threshold(gray: &GrayImage) -> u8 {
    let mut histogram = [0u64; 256];
    for pixel in gray.pixels() {
        histogram[pixel.0[0] as usize] += 1;
    }

    let total = gray.width() as u64 * gray.height() as u64;
    if total == 0 {
        return 128;
    }

    let weighted_sum: u64 = histogram
        .iter()
        .enumerate()
        .map(|(level, &count)| level as u64 * count)
        .sum();

    let mut background_count = 0u64;
    let mut background_sum = 0u64;
    let mut best_threshold = 128u8;
    let mut best_variance = 0.0f64;

    for level in 0..256usize {
        background_count += histogram[level];
        if background_count == 0 {
            continue;
        }
        let foreground_count = total - background_count;
        if foreground_count == 0 {
            break;
        }
        background_sum += level as u64 * histogram[level];

        let background_mean = background_sum as f64 / background_count as f64;
        let foreground_mean = (weighted_sum - background_sum) as f64 / foreground_count as f64;
        let mean_diff = background_mean - foreground_mean;
        let variance = background_count as f64 * foreground_count as f64 * mean_diff * mean_diff;

        if variance > best_variance {
            best_variance = variance;
            best_threshold = level as u8;
        }
    }

    best_threshold
}
