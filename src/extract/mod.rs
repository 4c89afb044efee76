//! Field extraction from recognized document text
//!
//! Two flavors: the patient report matchers (name, phone, medical problems,
//! vaccination status) and the line-aware prescription parser (doctor,
//! patient, date, address, medicines, refills).

mod patient;
mod prescription;
mod text;

pub use patient::{
    match_medical_problems, match_patient_name, match_phone_number, match_vaccination,
    parse_patient_report, ExtractionResult,
};
pub use prescription::{normalize_date, parse_prescription, Medicine, Prescription, PrescriptionParser};
pub use text::clean_ocr_text;
