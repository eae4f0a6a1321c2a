//! RG (general registry) number extraction.
//!
//! RG numbers are issued per state and carry no universal checksum, so only
//! the digit count (7 to 10) is checked. Runs of one repeated digit are
//! rejected as OCR noise.

use regex::Regex;

use super::patterns::{RG_LABELED, RG_REGISTRO_GERAL, RG_STANDALONE};
use super::text::{all_same, digit_values, only_digits};
use super::{ExtractionMatch, FieldExtractor};

const MIN_DIGITS: usize = 7;
const MAX_DIGITS: usize = 10;

/// RG field extractor.
pub struct RgExtractor {
    rules: Vec<(&'static Regex, f32)>,
}

impl RgExtractor {
    pub fn new() -> Self {
        Self {
            rules: vec![
                (&*RG_LABELED, 0.95),
                (&*RG_REGISTRO_GERAL, 0.95),
                (&*RG_STANDALONE, 0.5),
            ],
        }
    }
}

impl Default for RgExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for RgExtractor {
    type Output = ExtractionMatch<String>;

    /// The first match of the first pattern that matches at all, provided
    /// its digit count is acceptable; otherwise the next pattern is tried.
    fn extract(&self, text: &str) -> Option<Self::Output> {
        let upper = text.to_uppercase();

        self.rules.iter().find_map(|(pattern, confidence)| {
            pattern
                .captures(&upper)
                .and_then(|caps| to_match(&caps, *confidence))
        })
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let upper = text.to_uppercase();
        let mut results: Vec<Self::Output> = Vec::new();

        for (pattern, confidence) in &self.rules {
            for caps in pattern.captures_iter(&upper) {
                if let Some(m) = to_match(&caps, *confidence) {
                    if !results.iter().any(|r| r.value == m.value) {
                        results.push(m);
                    }
                }
            }
        }

        results
    }
}

fn to_match(caps: &regex::Captures<'_>, confidence: f32) -> Option<ExtractionMatch<String>> {
    let full = caps.get(0)?;
    let rg = only_digits(caps.get(1)?.as_str());

    if !(MIN_DIGITS..=MAX_DIGITS).contains(&rg.len()) || all_same(&digit_values(&rg)) {
        return None;
    }

    Some(ExtractionMatch::new(rg, confidence, full.as_str()).with_position(full.start(), full.end()))
}

/// Extract an RG number as plain digits.
pub fn extract_rg(text: &str) -> Option<String> {
    RgExtractor::new().extract(text).map(|m| m.value)
}
