//! Patient report field matchers
//!
//! Each matcher is an independent pattern rule over recognized text. A
//! matcher never fails: an unmatched pattern yields None and the serialized
//! response carries an explicit null for that key.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::text::collapse_whitespace;

/// How many non-empty lines from the top of the document the name fallback
/// scans.
const NAME_SCAN_LINES: usize = 10;

/// How many characters after a vaccination mention may hold the yes/no token.
const VACCINATION_WINDOW: usize = 80;

static PATIENT_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:Patient|Name)[:;\-\s]*([A-Z][A-Za-z.'\s\-]{1,60}?)(?:\s+Date\b|\n|$)")
        .unwrap()
});

static SKIP_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:Address|Date|Phone|Dr|Physician|Directions|Refill|Amount|Page)\b")
        .unwrap()
});

static NAME_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:Name|Patient)[:;\-\s]*").unwrap());

static NAME_WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z][A-Za-z.'\-]+$").unwrap());

static BARE_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bName\b[^\nA-Za-z0-9]{0,6}([A-Z][A-Za-z'\-]+(?:\s+[A-Z][A-Za-z'\-]+){1,3})")
        .unwrap()
});

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(?\d{3}\)?[\s.\-]?\d{3}[\s.\-]?\d{4}\b").unwrap());

static CONDITION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:shortness of breath|kidney disease|heart disease|liver disease|constipation|hypertension|cholesterol|sore throat|tonsillitis|bronchitis|chest pain|depression|allergies|arthritis|back pain|dizziness|infection|influenza|pneumonia|psoriasis|sinusitis|diabetes|diarrhea|headache|insomnia|migraine|vomiting|wheezing|allergy|anxiety|fatigue|obesity|thyroid|vertigo|anemia|asthma|cancer|eczema|nausea|stroke|cough|covid|fever|ulcer|cold|rash|flu)\b",
    )
    .unwrap()
});

static HEPATITIS_B_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bhepatitis\s*\-?\s*b\b(?:\s+vaccination|\s+vaccine)?").unwrap()
});

static YES_NO_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\b(yes|no)\b").unwrap());

static TRAILING_PUNCT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[,:;|\-]+$").unwrap());

static TRAILING_SOFT_PUNCT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[,:;|]+$").unwrap());

/// Fields pulled out of a patient report document.
///
/// Every key is present in the serialized form; an unmatched field is null.
/// `medical_problems` is null when nothing matched, never an empty list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub patient_name: Option<String>,
    pub phone_number: Option<String>,
    pub medical_problems: Option<Vec<String>>,
    pub hepatitis_b_vaccination: Option<String>,
}

/// Runs every field matcher over the raw OCR text.
///
/// The matchers work on the text exactly as recognized. Aggressive cleanup
/// would eat meaningful single letters such as the "B" in "Hepatitis B".
pub fn parse_patient_report(text: &str) -> ExtractionResult {
    ExtractionResult {
        patient_name: match_patient_name(text),
        phone_number: match_phone_number(text),
        medical_problems: match_medical_problems(text),
        hepatitis_b_vaccination: match_vaccination(text),
    }
}

/// First "label: value" match wins. Otherwise scan the top of the document
/// for a name-shaped line, then accept a bare capitalized run after the
/// word "Name".
pub fn match_patient_name(text: &str) -> Option<String> {
    if let Some(caps) = PATIENT_LABEL_RE.captures(text) {
        return Some(tidy_name(&caps[1]));
    }

    let top_lines = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(NAME_SCAN_LINES);
    for line in top_lines {
        if SKIP_LINE_RE.is_match(line) {
            continue;
        }
        let stripped = NAME_PREFIX_RE.replace(line, "");
        let stripped = stripped.trim();
        let words: Vec<&str> = stripped.split_whitespace().collect();
        if (2..=4).contains(&words.len()) && words.iter().all(|w| NAME_WORD_RE.is_match(w)) {
            let candidate = TRAILING_SOFT_PUNCT_RE.replace(stripped, "");
            return Some(collapse_whitespace(&candidate));
        }
    }

    BARE_NAME_RE
        .captures(text)
        .map(|caps| collapse_whitespace(&caps[1]))
}

/// First phone-shaped substring wins, returned exactly as it appears.
pub fn match_phone_number(text: &str) -> Option<String> {
    PHONE_RE.find(text).map(|m| m.as_str().to_string())
}

/// Every vocabulary keyword in order of first appearance, deduplicated
/// case-insensitively. None when nothing matched.
pub fn match_medical_problems(text: &str) -> Option<Vec<String>> {
    let mut seen: Vec<String> = Vec::new();
    let mut problems = Vec::new();
    for m in CONDITION_RE.find_iter(text) {
        let key = m.as_str().to_lowercase();
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        problems.push(m.as_str().to_string());
    }
    if problems.is_empty() {
        None
    } else {
        Some(problems)
    }
}

/// "No" when the document never mentions the vaccination at all; otherwise
/// the yes/no token within a short window after the mention, if any.
pub fn match_vaccination(text: &str) -> Option<String> {
    let Some(m) = HEPATITIS_B_RE.find(text) else {
        return Some("No".to_string());
    };
    let window: String = text[m.end()..].chars().take(VACCINATION_WINDOW).collect();
    YES_NO_RE.captures(&window).map(|caps| {
        if caps[1].eq_ignore_ascii_case("yes") {
            "Yes".to_string()
        } else {
            "No".to_string()
        }
    })
}

pub(crate) fn tidy_name(raw: &str) -> String {
    let stripped = TRAILING_PUNCT_RE.replace(raw.trim(), "");
    collapse_whitespace(&stripped)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "Name: Jane Poe\n\
                          Phone: (737) 988-0851\n\
                          Patient reports Fever and Cough for three days.\n\
                          Hepatitis B Vaccination: No";

    #[test]
    fn labeled_name_wins() {
        assert_eq!(match_patient_name(REPORT), Some("Jane Poe".to_string()));
    }

    #[test]
    fn name_falls_back_to_top_lines() {
        let text = "Some header\nAdarta Sharapova\nOther info";
        assert_eq!(match_patient_name(text), Some("Adarta Sharapova".to_string()));
    }

    #[test]
    fn name_fallback_skips_label_lines() {
        let text = "Phone East Wing\nJane Poe\nmore text";
        assert_eq!(match_patient_name(text), Some("Jane Poe".to_string()));
    }

    #[test]
    fn no_name_shaped_text_yields_none() {
        assert_eq!(match_patient_name("lowercase only\nnothing here"), None);
    }

    #[test]
    fn phone_is_extracted_exactly_as_written() {
        assert_eq!(
            match_phone_number("call (737) 988-0851 today"),
            Some("(737) 988-0851".to_string())
        );
        assert_eq!(
            match_phone_number("Phone: (000)-141-2222"),
            Some("(000)-141-2222".to_string())
        );
        assert_eq!(match_phone_number("737.988.0851"), Some("737.988.0851".to_string()));
    }

    #[test]
    fn first_phone_wins() {
        let text = "home (111) 222-3333 work (444) 555-6666";
        assert_eq!(match_phone_number(text), Some("(111) 222-3333".to_string()));
    }

    #[test]
    fn missing_phone_is_none() {
        assert_eq!(match_phone_number("no digits to speak of"), None);
    }

    #[test]
    fn problems_keep_document_order() {
        assert_eq!(
            match_medical_problems("Fever,Cough"),
            Some(vec!["Fever".to_string(), "Cough".to_string()])
        );
    }

    #[test]
    fn problems_dedupe_case_insensitively() {
        assert_eq!(
            match_medical_problems("fever, Fever, FEVER, cough"),
            Some(vec!["fever".to_string(), "cough".to_string()])
        );
    }

    #[test]
    fn multi_word_conditions_match_whole() {
        assert_eq!(
            match_medical_problems("complains of shortness of breath"),
            Some(vec!["shortness of breath".to_string()])
        );
    }

    #[test]
    fn no_problems_is_none_not_empty() {
        assert_eq!(match_medical_problems("perfectly healthy"), None);
    }

    #[test]
    fn vaccination_no_token_is_reported() {
        assert_eq!(
            match_vaccination("Hepatitis B Vaccination: No"),
            Some("No".to_string())
        );
    }

    #[test]
    fn vaccination_yes_token_is_reported() {
        assert_eq!(
            match_vaccination("Hepatitis B vaccine: Yes (2019)"),
            Some("Yes".to_string())
        );
    }

    #[test]
    fn vaccination_defaults_to_no_when_keyword_absent() {
        assert_eq!(match_vaccination("no mention of it"), Some("No".to_string()));
    }

    #[test]
    fn vaccination_keyword_without_token_is_null() {
        assert_eq!(match_vaccination("Hepatitis B vaccine status unclear"), None);
    }

    #[test]
    fn report_parses_all_four_fields() {
        let result = parse_patient_report(REPORT);
        assert_eq!(result.patient_name.as_deref(), Some("Jane Poe"));
        assert_eq!(result.phone_number.as_deref(), Some("(737) 988-0851"));
        assert_eq!(
            result.medical_problems,
            Some(vec!["Fever".to_string(), "Cough".to_string()])
        );
        assert_eq!(result.hepatitis_b_vaccination.as_deref(), Some("No"));
    }

    #[test]
    fn report_vaccination_yes_is_detected() {
        let result = parse_patient_report("Hepatitis B Vaccination: Yes");
        assert_eq!(result.hepatitis_b_vaccination.as_deref(), Some("Yes"));
    }

    #[test]
    fn all_keys_serialize_even_when_null() {
        let result = parse_patient_report("nothing recognizable here");
        let value = serde_json::to_value(&result).unwrap();
        let object = value.as_object().unwrap();
        assert!(object.contains_key("patient_name"));
        assert!(object.contains_key("phone_number"));
        assert!(object.contains_key("medical_problems"));
        assert!(object.contains_key("hepatitis_b_vaccination"));
        assert!(value["patient_name"].is_null());
        assert!(value["medical_problems"].is_null());
        assert_eq!(value["hepatitis_b_vaccination"], "No");
    }
}
