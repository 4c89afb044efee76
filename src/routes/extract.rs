//! Document extraction endpoints
//!
//! Endpoints:
//! - `POST /extract_from_doc` - patient report fields from an uploaded document
//! - `POST /extract_prescription` - prescription entities from an uploaded document

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::document::{DocumentError, DocumentFormat};
use crate::error::ApiError;
use crate::extract::{parse_patient_report, parse_prescription, ExtractionResult, Prescription};
use crate::raster::rasterize;
use crate::state::AppState;

/// Extract the patient report fields from an uploaded document.
pub async fn extract_from_doc(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ExtractionResult>, ApiError> {
    let text = run_pipeline(&state, multipart).await?;
    Ok(Json(parse_patient_report(&text)))
}

/// Extract prescription entities from an uploaded document.
pub async fn extract_prescription(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Prescription>, ApiError> {
    let text = run_pipeline(&state, multipart).await?;
    Ok(Json(parse_prescription(&text)))
}

/// Upload form fields.
struct Upload {
    format_hint: String,
    data: Vec<u8>,
}

/// Rasterize, recognize, and concatenate page text for an upload.
async fn run_pipeline(state: &AppState, multipart: Multipart) -> Result<String, ApiError> {
    let upload = read_upload(multipart).await?;
    let format = DocumentFormat::from_hint(&upload.format_hint)
        .ok_or_else(|| DocumentError::UnsupportedFormat(upload.format_hint.clone()))?;

    tracing::info!(
        format = format.as_str(),
        bytes = upload.data.len(),
        "Received extraction request"
    );

    let pages = rasterize(upload.data, format, state.config().raster.dpi).await?;
    let raw = state.text_extractor().extract(pages).await?;

    tracing::debug!(pages = raw.page_count(), "Recognition finished");
    Ok(raw.concatenated())
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, ApiError> {
    let mut format_hint: Option<String> = None;
    let mut data: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file_format" => {
                format_hint = Some(field.text().await?);
            }
            "file" => {
                data = Some(field.bytes().await?.to_vec());
            }
            _ => {
                tracing::debug!(field = %name, "Ignoring unknown multipart field");
            }
        }
    }

    let format_hint = format_hint.ok_or(ApiError::MissingField("file_format"))?;
    let data = data.ok_or(ApiError::MissingField("file"))?;
    Ok(Upload { format_hint, data })
}
