//! CPF (Brazilian individual taxpayer number) extraction and validation.

use super::patterns::{CPF_FORMATTED, ELEVEN_DIGITS};
use super::text::{all_same, digit_values, only_digits};
use super::{ExtractionMatch, FieldExtractor};

/// CPF field extractor.
///
/// Only checksum-valid candidates are ever returned.
pub struct CpfExtractor;

impl CpfExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CpfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CpfExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results: Vec<Self::Output> = Vec::new();

        // Unformatted scan: 11-digit chunks of the digit-only text
        let digits = only_digits(text);
        for m in ELEVEN_DIGITS.find_iter(&digits) {
            if validate_cpf(m.as_str()) {
                results.push(ExtractionMatch::new(format_cpf(m.as_str()), 0.8, m.as_str()));
            }
        }

        // Formatted scan over the original text
        for m in CPF_FORMATTED.find_iter(text) {
            let clean = only_digits(m.as_str());
            if !validate_cpf(&clean) {
                continue;
            }

            let cpf = format_cpf(&clean);
            if results.iter().any(|r| r.value == cpf) {
                continue;
            }

            results.push(
                ExtractionMatch::new(cpf, 0.9, m.as_str()).with_position(m.start(), m.end()),
            );
        }

        results
    }
}

/// Extract the first checksum-valid CPF, formatted as `XXX.XXX.XXX-XX`.
pub fn extract_cpf(text: &str) -> Option<String> {
    CpfExtractor::new().extract(text).map(|m| m.value)
}

/// Validate a CPF using the mod-11 check-digit algorithm.
///
/// Non-digit characters are ignored; exactly 11 digits are required and
/// sequences of one repeated digit are rejected.
pub fn validate_cpf(cpf: &str) -> bool {
    let digits = digit_values(cpf);

    if digits.len() != 11 || all_same(&digits) {
        return false;
    }

    check_digit(&digits[..9]) == digits[9] && check_digit(&digits[..10]) == digits[10]
}

/// Weights run from `len + 1` down to 2.
fn check_digit(digits: &[u32]) -> u32 {
    let top = digits.len() as u32 + 1;
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| d * (top - i as u32))
        .sum();

    let remainder = (sum * 10) % 11;
    if remainder == 10 { 0 } else { remainder }
}

/// Format CPF as `XXX.XXX.XXX-XX`.
pub fn format_cpf(cpf: &str) -> String {
    let digits = only_digits(cpf);

    if digits.len() != 11 {
        return cpf.to_string();
    }

    format!(
        "{}.{}.{}-{}",
        &digits[0..3],
        &digits[3..6],
        &digits[6..9],
        &digits[9..11]
    )
}
