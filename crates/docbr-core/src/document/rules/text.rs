//! Text normalization helpers shared by the extractors.

/// Keep only ASCII digits.
pub fn only_digits(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// ASCII digit values of `text`, ignoring every other character.
pub(crate) fn digit_values(text: &str) -> Vec<u32> {
    text.chars().filter_map(|c| c.to_digit(10)).collect()
}

/// True when every digit is the same (e.g. "11111111111").
pub(crate) fn all_same(digits: &[u32]) -> bool {
    digits.windows(2).all(|w| w[0] == w[1])
}

/// Title-case a name: first letter of every alphabetic run uppercased, the rest lowercased.
///
/// "MARIA D'ÁVILA" becomes "Maria D'Ávila".
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }

    out
}
