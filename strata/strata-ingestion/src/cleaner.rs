//! Text normalization ahead of chunking.
//!
//! Cleaning standardizes extracted text without destroying
//! information: the original content always travels alongside the
//! cleaned version (Detail-Preservation Rule), and the net character
//! delta is recorded so the effect stays measurable.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;
use strata_core::types::{CleanedUnit, ExtractionUnit};
use unicode_normalization::UnicodeNormalization;

// Words broken across a line by a trailing hyphen. A hyphen not
// followed by a line break is left alone so compounds like "x-ray"
// survive.
static HYPHEN_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\w+)-\s*\n\s*(\w+)").unwrap());
static SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());
static NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());
// Every Unicode control/format character except newline and tab.
static CONTROL: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{C}--[\n\t]]").unwrap());

static PAGE_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^page \d+( of \d+)?$").unwrap());
static BARE_NUMERAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-? ?\d+ ?-?$").unwrap());

/// Pure-function text cleaner; also hosts the boilerplate heuristic.
#[derive(Debug, Default, Clone)]
pub struct TextCleaner;

impl TextCleaner {
    pub fn new() -> Self {
        Self
    }

    /// Normalize one unit's text. Pure and idempotent; empty input
    /// cleans to empty output.
    pub fn clean(text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        // 1. Unicode canonical-compatibility normalization
        let text: String = text.nfkc().collect();

        // 2. Rejoin words broken across lines by a trailing hyphen
        let text = HYPHEN_BREAK.replace_all(&text, "$1$2");

        // 3. Strip control characters except newline and tab. Runs
        //    before the space collapse so a control character flanked
        //    by spaces cannot leave a double space behind.
        let text = CONTROL.replace_all(&text, "");

        // 4. Whitespace: NBSP to space, runs of spaces/tabs to one,
        //    2+ newlines to exactly two (paragraph breaks survive)
        let text = text.replace('\u{a0}', " ");
        let text = SPACES.replace_all(&text, " ");
        let text = NEWLINES.replace_all(&text, "\n\n");

        // 5. Trim
        text.trim().to_string()
    }

    /// Advisory heuristic for headers, footers and page numbers.
    ///
    /// The pipeline never drops boilerplate on its own; callers apply
    /// this as a filter before chunking if desired.
    pub fn is_boilerplate(text: &str) -> bool {
        let text = text.trim();

        if text.is_empty() {
            return true;
        }
        if PAGE_NUMBER.is_match(text) || BARE_NUMERAL.is_match(text) {
            return true;
        }
        // Too short to be meaningful content
        if text.chars().count() < 5 && !text.chars().any(|c| c.is_alphabetic()) {
            return true;
        }

        false
    }

    /// Clean one extraction unit, always retaining the original text.
    pub fn process_unit(&self, unit: ExtractionUnit) -> CleanedUnit {
        let cleaned = Self::clean(&unit.content);
        let char_reduction =
            unit.content.chars().count() as i64 - cleaned.chars().count() as i64;

        let mut metadata = unit.metadata;
        metadata.insert("cleaned".to_string(), json!(true));
        metadata.insert("char_reduction".to_string(), json!(char_reduction));

        CleanedUnit {
            content_original: unit.content,
            content: cleaned,
            char_reduction,
            position: unit.position,
            mode: unit.mode,
            metadata,
        }
    }
}
