//! Health check endpoint
//!
//! Endpoints:
//! - `GET /health` - service liveness plus a live OCR engine probe

use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub ocr_engine: &'static str,
    pub ocr_available: bool,
}

/// Report liveness and whether the configured OCR engine responds.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let ocr_available = state.engine().is_available().await;
    Json(HealthResponse {
        status: "healthy",
        service: "receta-server",
        version: env!("CARGO_PKG_VERSION"),
        ocr_engine: state.engine().kind().as_str(),
        ocr_available,
    })
}
