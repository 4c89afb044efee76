//! Prescription entity extraction
//!
//! Line-aware parser for scanned prescriptions. The matchers tolerate the
//! usual OCR damage (mangled units, stray punctuation); a normalization pass
//! canonicalizes whitespace and dates on the way out.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::patient::{match_patient_name, tidy_name};
use super::text::{clean_ocr_text, collapse_whitespace};

static DOCTOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:Dr\.?|Doctor|Physician)[:\s\-]*([A-Z][A-Za-z.'\- ]{1,60})").unwrap()
});

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b\d{1,2}[/\-]\d{1,2}[/\-]\d{2,4}\b|\b\d{1,2}\s+(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\s+\d{2,4}\b|\b(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\s+\d{1,2},?\s+\d{4}\b",
    )
    .unwrap()
});

static DATE_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Date[:;\s]*([^\n]{0,30})").unwrap());

static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").unwrap());

static DATE_TAIL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bDate\b.*$").unwrap());

static REFILL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bRefills?\s*[:\-]?\s*([0-9]+)").unwrap());

static ADDRESS_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bAddress[:\s\-]").unwrap());

static ADDRESS_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Address[:\s\-]*").unwrap());

static ADDRESS_FALLBACK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bAddress[:\s]*([A-Za-z0-9,.\s\-]{10,120})").unwrap());

static STREET_LINE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Z][a-z]{2,}\s+\d").unwrap());

static REFILL_WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bRefill\b").unwrap());

static SPACE_BEFORE_COMMA_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+,").unwrap());

static UNIT_WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:mg|g|gram|grams|ml|mcg|tablet|tab|capsule|drop|patch)\b").unwrap()
});

static DIRECTION_WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:take|every|daily|once|twice|before|after|with|apply|taper|inhale|use|for)\b")
        .unwrap()
});

static MED_SKIP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:Address|Name|Date|Phone|Refill|Page|Directions)\b").unwrap()
});

static MED_PAIR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)([A-Za-z][A-Za-z0-9()/.\s\-]{2,80}?)\s*[,:\-]?\s*(\d{1,3}(?:\.\d+)?\s*(?:mg|g|gram|grams|ml|mcg))",
    )
    .unwrap()
});

static MED_NAME_ONLY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Za-z][A-Za-z'\-]{2,60})\b").unwrap());

static MED_NAME_JUNK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9()/.'\- ]+").unwrap());

static MED_DOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b\d[\d.]*\s*(?:mg|g|gram|grams|ml|mcg)\b").unwrap());

static MED_SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[,;\-:]\s*").unwrap());

static SIX_LETTER_WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[A-Za-z]{6,}\b").unwrap());

static LEADING_DIGIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\d").unwrap());

const DATE_FORMATS: [&str; 9] = [
    "%d/%m/%Y", "%d-%m-%Y", "%d/%m/%y", "%d-%m-%y", "%Y-%m-%d", "%d %b %Y", "%d %B %Y",
    "%b %d, %Y", "%B %d, %Y",
];

/// One prescribed medicine. Missing pieces are empty strings, not nulls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medicine {
    pub name: String,
    pub strength: String,
    pub directions: String,
}

impl Medicine {
    fn normalized(&self) -> Medicine {
        Medicine {
            name: collapse_whitespace(&self.name),
            strength: collapse_whitespace(&self.strength),
            directions: collapse_whitespace(&self.directions),
        }
    }
}

/// Structured prescription fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    pub doctor_name: Option<String>,
    pub patient_name: Option<String>,
    pub date: Option<String>,
    pub parsed_date: Option<String>,
    pub patient_address: Option<String>,
    pub medicines: Vec<Medicine>,
    pub refills: u32,
    pub warnings: Vec<String>,
}

/// Parses prescription fields out of raw OCR text.
pub fn parse_prescription(text: &str) -> Prescription {
    PrescriptionParser::new(text).parse()
}

/// Line-aware prescription parser over cleaned OCR text.
pub struct PrescriptionParser {
    text: String,
    lines: Vec<String>,
}

impl PrescriptionParser {
    pub fn new(raw: &str) -> Self {
        let text = clean_ocr_text(raw);
        let lines = text.lines().map(str::to_string).collect();
        Self { text, lines }
    }

    pub fn parse(&self) -> Prescription {
        let patient_name = self.patient_name().and_then(|name| {
            let name = DATE_TAIL_RE.replace(&name, "");
            let name = collapse_whitespace(&name);
            if name.is_empty() {
                None
            } else {
                Some(name)
            }
        });
        let date = self.date();
        let parsed_date = date.as_deref().and_then(normalize_date);
        let patient_address = self.address().map(|addr| {
            collapse_whitespace(&addr)
                .trim_end_matches(|c| matches!(c, '.' | ',' | '|'))
                .to_string()
        });
        let medicines = self.medicines().iter().map(Medicine::normalized).collect();

        Prescription {
            doctor_name: self.doctor_name(),
            patient_name,
            date,
            parsed_date,
            patient_address,
            medicines,
            refills: self.refills(),
            warnings: Vec::new(),
        }
    }

    fn doctor_name(&self) -> Option<String> {
        DOCTOR_RE.captures(&self.text).map(|caps| tidy_name(&caps[1]))
    }

    fn patient_name(&self) -> Option<String> {
        match_patient_name(&self.text)
    }

    /// Full date expression first, then a year on the "Date" line, then the
    /// first plausible year anywhere.
    fn date(&self) -> Option<String> {
        if let Some(m) = DATE_RE.find(&self.text) {
            return Some(m.as_str().trim().to_string());
        }
        if let Some(caps) = DATE_LINE_RE.captures(&self.text) {
            if let Some(year) = YEAR_RE.find(&caps[1]) {
                return Some(year.as_str().to_string());
            }
        }
        YEAR_RE.find(&self.text).map(|m| m.as_str().to_string())
    }

    fn refills(&self) -> u32 {
        REFILL_RE
            .captures(&self.text)
            .and_then(|caps| caps[1].parse().ok())
            .unwrap_or(0)
    }

    /// Accumulates lines starting at the "Address" label until a line looks
    /// like dosage, directions, refills, or a new "Word 123" block.
    fn address(&self) -> Option<String> {
        let mut parts: Vec<&str> = Vec::new();
        let mut found = false;
        for line in &self.lines {
            if !found {
                if ADDRESS_LABEL_RE.is_match(line) {
                    if let Some(tail) = ADDRESS_SPLIT_RE.split(line).last() {
                        let tail = tail.trim();
                        if !tail.is_empty() {
                            parts.push(tail);
                        }
                    }
                    found = true;
                }
            } else {
                if UNIT_WORD_RE.is_match(line)
                    || DIRECTION_WORD_RE.is_match(line)
                    || REFILL_WORD_RE.is_match(line)
                    || STREET_LINE_RE.is_match(line)
                {
                    break;
                }
                parts.push(line);
            }
        }

        if !parts.is_empty() {
            let joined = parts.join(" ");
            let joined = SPACE_BEFORE_COMMA_RE.replace_all(&joined, ",");
            return Some(
                joined
                    .trim()
                    .trim_end_matches(|c| matches!(c, '.' | ','))
                    .to_string(),
            );
        }

        ADDRESS_FALLBACK_RE.captures(&self.text).map(|caps| {
            caps[1]
                .trim()
                .trim_end_matches(|c| matches!(c, '.' | ','))
                .to_string()
        })
    }

    /// Name+strength pairs first. Lines without a strength fall back to a
    /// bare-name heuristic. Directions come from the tail of the line or
    /// from the next two lines.
    fn medicines(&self) -> Vec<Medicine> {
        let mut meds: Vec<Medicine> = Vec::new();

        for (idx, line) in self.lines.iter().enumerate() {
            // Label lines never carry a medicine.
            if MED_SKIP_RE.is_match(line) {
                continue;
            }

            let mut line_meds = Vec::new();
            for caps in MED_PAIR_RE.captures_iter(line) {
                let (Some(whole), Some(name_m), Some(strength_m)) =
                    (caps.get(0), caps.get(1), caps.get(2))
                else {
                    continue;
                };
                let name = MED_NAME_JUNK_RE.replace_all(name_m.as_str().trim(), "");
                let name = name.trim().to_string();
                if name.chars().filter(|c| c.is_ascii_alphabetic()).count() < 3 {
                    continue;
                }
                let post = trim_separators(&line[whole.end()..]);
                let directions = if DIRECTION_WORD_RE.is_match(post) {
                    post.to_string()
                } else {
                    self.direction_from_following_lines(idx)
                };
                line_meds.push(Medicine {
                    name,
                    strength: strength_m.as_str().trim().to_string(),
                    directions,
                });
            }

            if !line_meds.is_empty() {
                meds.extend(line_meds);
                continue;
            }

            let looks_like_medicine = UNIT_WORD_RE.is_match(line)
                || LEADING_DIGIT_RE.is_match(line)
                || SIX_LETTER_WORD_RE.is_match(line);
            if !looks_like_medicine {
                continue;
            }

            let candidate = MED_SPLIT_RE.splitn(line, 2).next().unwrap_or("").trim();
            let candidate = MED_DOSE_RE.replace_all(candidate, "");
            let candidate = candidate.trim();
            if let Some(caps) = MED_NAME_ONLY_RE.captures(candidate) {
                let post = trim_separators(line.get(candidate.len()..).unwrap_or(""));
                let directions = if DIRECTION_WORD_RE.is_match(post) {
                    post.to_string()
                } else {
                    self.direction_from_following_lines(idx)
                };
                meds.push(Medicine {
                    name: caps[1].trim().to_string(),
                    strength: String::new(),
                    directions,
                });
            }
        }

        dedupe_medicines(meds)
    }

    fn direction_from_following_lines(&self, idx: usize) -> String {
        for offset in 1..3 {
            if let Some(next) = self.lines.get(idx + offset) {
                if DIRECTION_WORD_RE.is_match(next) {
                    return next.clone();
                }
            }
        }
        String::new()
    }
}

/// Canonicalizes a date string to ISO `YYYY-MM-DD`. A bare year becomes
/// January 1st of that year.
pub fn normalize_date(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date.format("%Y-%m-%d").to_string());
        }
    }
    YEAR_RE
        .find(trimmed)
        .map(|year| format!("{}-01-01", year.as_str()))
}

fn trim_separators(value: &str) -> &str {
    value.trim_matches(|c| matches!(c, ' ' | ',' | ';' | ':' | '-'))
}

// First occurrence wins for a (name, strength) pair.
fn dedupe_medicines(meds: Vec<Medicine>) -> Vec<Medicine> {
    let mut seen: Vec<(String, String)> = Vec::new();
    let mut out = Vec::new();
    for med in meds {
        let key = (med.name.to_lowercase(), med.strength.to_lowercase());
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        out.push(med);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Dr. John Doe\n\
                          Phone: (000)-141-2222\n\
                          Name: Adarta Sharapova Date: wfil/2022\n\
                          Address: 9 tennis court, new Russia, DC\n\
                          Prednisone 20 mg\n\
                          Lialda 2.4 gram\n\
                          Directions:\n\
                          Prednisone, Taper 5 mg every 3 days,\n\
                          Lialda - take 2 pill everyday for 1 month\n\
                          Refill: 2";

    #[test]
    fn doctor_name_from_prefix() {
        let rx = parse_prescription(SAMPLE);
        assert_eq!(rx.doctor_name.as_deref(), Some("John Doe"));
    }

    #[test]
    fn doctor_with_middle_initial() {
        let rx = parse_prescription("Dr. Samuel L. Jackson\nAddress: somewhere");
        assert!(rx.doctor_name.unwrap().starts_with("Samuel L"));
    }

    #[test]
    fn patient_name_stops_before_date_label() {
        let rx = parse_prescription(SAMPLE);
        assert_eq!(rx.patient_name.as_deref(), Some("Adarta Sharapova"));
    }

    #[test]
    fn patient_name_with_semicolon_label() {
        let rx = parse_prescription("Name; Adarta Sharapova Date: wfil/2022\nAddress: 9 tennis court");
        assert_eq!(rx.patient_name.as_deref(), Some("Adarta Sharapova"));
    }

    #[test]
    fn patient_name_keeps_hyphen_and_apostrophe() {
        let rx = parse_prescription("Patient: Mary-Ann O'Neill\nAddress: x");
        assert_eq!(rx.patient_name.as_deref(), Some("Mary-Ann O'Neill"));
    }

    #[test]
    fn date_falls_back_to_year_on_date_line() {
        let rx = parse_prescription(SAMPLE);
        assert_eq!(rx.date.as_deref(), Some("2022"));
        assert_eq!(rx.parsed_date.as_deref(), Some("2022-01-01"));
    }

    #[test]
    fn full_numeric_date_is_matched_whole() {
        let rx = parse_prescription("Date: 15/03/2022\nName: Jane Poe");
        assert_eq!(rx.date.as_deref(), Some("15/03/2022"));
        assert_eq!(rx.parsed_date.as_deref(), Some("2022-03-15"));
    }

    #[test]
    fn address_stops_at_dosage_line() {
        let rx = parse_prescription(SAMPLE);
        let addr = rx.patient_address.unwrap();
        assert!(addr.to_lowercase().contains("tennis court"));
        assert!(addr.to_lowercase().contains("russia"));
    }

    #[test]
    fn refills_parse_as_integer() {
        let rx = parse_prescription(SAMPLE);
        assert_eq!(rx.refills, 2);
    }

    #[test]
    fn missing_refills_default_to_zero() {
        let rx = parse_prescription("Name: Jane Poe");
        assert_eq!(rx.refills, 0);
    }

    #[test]
    fn medicines_include_name_and_strength() {
        let rx = parse_prescription(SAMPLE);
        let names: Vec<String> = rx.medicines.iter().map(|m| m.name.to_lowercase()).collect();
        assert!(names.contains(&"prednisone".to_string()));
        assert!(names.contains(&"lialda".to_string()));

        let prednisone = rx
            .medicines
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case("prednisone"))
            .unwrap();
        assert_eq!(prednisone.strength, "20 mg");

        let lialda = rx
            .medicines
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case("lialda"))
            .unwrap();
        assert_eq!(lialda.strength, "2.4 gram");
    }

    #[test]
    fn medicine_directions_found_on_following_lines() {
        let rx = parse_prescription(SAMPLE);
        let directed: Vec<&Medicine> = rx
            .medicines
            .iter()
            .filter(|m| !m.directions.is_empty())
            .collect();
        assert!(!directed.is_empty());
        assert!(rx
            .medicines
            .iter()
            .any(|m| m.directions.contains("take 2 pill everyday")));
    }

    #[test]
    fn label_lines_produce_no_medicines() {
        let rx = parse_prescription("Phone: (000)-141-2222\nAddress: 12 Main Street");
        assert!(rx.medicines.is_empty());
    }

    #[test]
    fn duplicate_medicines_are_collapsed() {
        let rx = parse_prescription("Prednisone 20 mg\nPrednisone 20 mg");
        assert_eq!(rx.medicines.len(), 1);
    }

    #[test]
    fn mangled_unit_is_repaired_before_matching() {
        let rx = parse_prescription("Prednisone 20 me\nRefill: 1");
        let prednisone = rx
            .medicines
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case("prednisone"))
            .unwrap();
        assert_eq!(prednisone.strength, "20 mg");
    }

    #[test]
    fn normalize_date_handles_common_layouts() {
        assert_eq!(normalize_date("15/03/2022").as_deref(), Some("2022-03-15"));
        assert_eq!(normalize_date("15-03-2022").as_deref(), Some("2022-03-15"));
        assert_eq!(normalize_date("2022-03-15").as_deref(), Some("2022-03-15"));
        assert_eq!(normalize_date("15 Mar 2022").as_deref(), Some("2022-03-15"));
        assert_eq!(normalize_date("Mar 15, 2022").as_deref(), Some("2022-03-15"));
        assert_eq!(normalize_date("wfil/2022").as_deref(), Some("2022-01-01"));
        assert_eq!(normalize_date("no date at all"), None);
        assert_eq!(normalize_date(""), None);
    }

    #[test]
    fn serialized_prescription_keeps_nullable_keys() {
        let rx = parse_prescription("bare scrap");
        let value = serde_json::to_value(&rx).unwrap();
        assert!(value["doctor_name"].is_null());
        assert!(value["patient_name"].is_null());
        assert!(value["parsed_date"].is_null());
        assert_eq!(value["refills"], 0);
        assert!(value["medicines"].as_array().unwrap().is_empty());
    }
}
