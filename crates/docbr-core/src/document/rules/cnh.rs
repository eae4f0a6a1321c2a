//! CNH (Brazilian driving license) number extraction and validation.

use regex::Regex;

use super::patterns::{CNH_LABELED, CNH_REGISTRO, CNH_STANDALONE};
use super::text::{all_same, digit_values};
use super::{ExtractionMatch, FieldExtractor};

/// CNH field extractor.
///
/// Patterns are tried from most to least specific; every candidate must
/// pass the CNH checksum.
pub struct CnhExtractor {
    rules: Vec<(&'static Regex, f32)>,
}

impl CnhExtractor {
    pub fn new() -> Self {
        Self {
            rules: vec![
                (&*CNH_LABELED, 0.95),
                (&*CNH_REGISTRO, 0.9),
                (&*CNH_STANDALONE, 0.6),
            ],
        }
    }
}

impl Default for CnhExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CnhExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let upper = text.to_uppercase();
        let mut results: Vec<Self::Output> = Vec::new();

        for (pattern, confidence) in &self.rules {
            for caps in pattern.captures_iter(&upper) {
                let (Some(full), Some(number)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };

                let cnh = number.as_str();
                if !validate_cnh(cnh) || results.iter().any(|r| r.value == cnh) {
                    continue;
                }

                results.push(
                    ExtractionMatch::new(cnh.to_string(), *confidence, full.as_str())
                        .with_position(full.start(), full.end()),
                );
            }
        }

        results
    }
}

/// Extract the first checksum-valid CNH number (11 digits).
pub fn extract_cnh(text: &str) -> Option<String> {
    CnhExtractor::new().extract(text).map(|m| m.value)
}

/// Validate a CNH number.
///
/// The first check digit weighs the nine base digits 9 down to 1; when it
/// overflows to 10 it becomes 0 and a discount of 2 is carried into the
/// second digit, which weighs the base digits 1 up to 9.
pub fn validate_cnh(cnh: &str) -> bool {
    let digits = digit_values(cnh);

    if digits.len() != 11 || all_same(&digits) {
        return false;
    }

    let base = &digits[..9];

    let first_sum: u32 = base
        .iter()
        .enumerate()
        .map(|(i, d)| d * (9 - i as u32))
        .sum();
    let (first, discount) = match first_sum % 11 {
        r if r >= 10 => (0, 2),
        r => (r, 0),
    };

    let second_sum: u32 = base
        .iter()
        .enumerate()
        .map(|(i, d)| d * (i as u32 + 1))
        .sum();
    let mut second = (second_sum % 11) as i32 - discount;
    if second < 0 {
        second += 11;
    }
    if second >= 10 {
        second = 0;
    }

    first == digits[9] && second as u32 == digits[10]
}
