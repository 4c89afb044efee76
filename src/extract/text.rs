//! OCR text cleanup for the prescription parser
//!
//! Scanned documents come back from recognition with smart dashes, non-ASCII
//! artifacts, and stray single letters where ink bled. Cleanup preserves
//! line breaks because the prescription matchers are line-aware.

use std::sync::LazyLock;

use regex::Regex;

static NON_PRINTABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\x09\x0A\x0D\x20-\x7E]").unwrap());

static MANGLED_MG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s+(?:me|m g|mgm)\b").unwrap());

static STRAY_LETTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\s)[A-Za-z](\s)").unwrap());

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Normalizes raw OCR output into trimmed ASCII lines.
///
/// Line structure is kept; empty lines are dropped. The output contains only
/// printable ASCII, so downstream byte slicing on match offsets is safe.
pub fn clean_ocr_text(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let text = raw.replace("\r\n", "\n").replace('\r', "\n");
    let text = text.replace('\u{2014}', "-").replace('\u{2013}', "-");
    let text = NON_PRINTABLE_RE.replace_all(&text, " ");

    let mut fixed = Vec::new();
    for line in text.split('\n') {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let line = MANGLED_MG_RE.replace_all(line, "$1 mg");
        let line = strip_stray_letters(&line);
        let line = collapse_whitespace(&line);
        if !line.is_empty() {
            fixed.push(line);
        }
    }
    fixed.join("\n")
}

/// Collapses runs of whitespace to single spaces and trims the ends.
pub(crate) fn collapse_whitespace(value: &str) -> String {
    WHITESPACE_RE.replace_all(value.trim(), " ").into_owned()
}

// A single letter flanked by whitespace is recognition debris. Matches
// consume their flanking whitespace, so adjacent strays need another pass;
// repeat until the line stops changing.
fn strip_stray_letters(line: &str) -> String {
    let mut current = line.to_string();
    loop {
        let next = STRAY_LETTER_RE.replace_all(&current, "$1$2").into_owned();
        if next == current {
            return next;
        }
        current = next;
    }
}
