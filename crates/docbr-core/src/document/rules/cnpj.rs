//! CNPJ (Brazilian company taxpayer number) validation.

use super::text::{all_same, digit_values, only_digits};

const FIRST_WEIGHTS: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
const SECOND_WEIGHTS: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

/// Validate a CNPJ using the mod-11 check-digit algorithm.
///
/// Non-digit characters are ignored; exactly 14 digits are required and
/// sequences of one repeated digit are rejected.
pub fn validate_cnpj(cnpj: &str) -> bool {
    let digits = digit_values(cnpj);

    if digits.len() != 14 || all_same(&digits) {
        return false;
    }

    check_digit(&digits[..12], &FIRST_WEIGHTS) == digits[12]
        && check_digit(&digits[..13], &SECOND_WEIGHTS) == digits[13]
}

fn check_digit(digits: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();

    match sum % 11 {
        r if r < 2 => 0,
        r => 11 - r,
    }
}

/// Format CNPJ as `XX.XXX.XXX/XXXX-XX`.
pub fn format_cnpj(cnpj: &str) -> String {
    let digits = only_digits(cnpj);

    if digits.len() != 14 {
        return cnpj.to_string();
    }

    format!(
        "{}.{}.{}/{}-{}",
        &digits[0..2],
        &digits[2..5],
        &digits[5..8],
        &digits[8..12],
        &digits[12..14]
    )
}
