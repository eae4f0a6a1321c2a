//! Person name extraction.
//!
//! Works on lines rather than flattened text: a label such as "NOME" is
//! frequently printed on its own line with the name on the line below.

use super::patterns::{NAME_LINE, NAME_TRAILER};
use super::text::title_case;
use super::{ExtractionMatch, FieldExtractor};

/// Labels that introduce a name.
pub const NAME_LABELS: [&str; 4] = ["NOME", "NAME", "FILIAÇÃO", "FILIACAO"];

const MIN_LABELED_CHARS: usize = 4;
const MIN_UNLABELED_CHARS: usize = 11;

/// Name field extractor.
pub struct NameExtractor;

impl NameExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract a title-cased name from ordered line texts.
    pub fn extract_from_lines<S: AsRef<str>>(&self, lines: &[S]) -> Option<ExtractionMatch<String>> {
        self.labeled(lines).or_else(|| self.unlabeled(lines))
    }

    fn labeled<S: AsRef<str>>(&self, lines: &[S]) -> Option<ExtractionMatch<String>> {
        for (i, line) in lines.iter().enumerate() {
            let upper = line.as_ref().to_uppercase();

            for label in NAME_LABELS {
                if !upper.contains(label) {
                    continue;
                }

                // Text after the label on the same line
                if let Some(after) = upper.split(label).nth(1) {
                    let after = after.trim_start_matches(|c: char| c == ':' || c.is_whitespace());
                    let name = NAME_TRAILER.replace(after, "");
                    let name = name.trim();
                    if name.chars().count() >= MIN_LABELED_CHARS {
                        return Some(ExtractionMatch::new(title_case(name), 0.9, line.as_ref()));
                    }
                }

                // Otherwise the following line
                if let Some(next) = lines.get(i + 1) {
                    let next = next.as_ref().trim();
                    if next.chars().count() >= MIN_LABELED_CHARS && is_alphabetic_words(next) {
                        return Some(ExtractionMatch::new(title_case(next), 0.85, next));
                    }
                }
            }
        }

        None
    }

    fn unlabeled<S: AsRef<str>>(&self, lines: &[S]) -> Option<ExtractionMatch<String>> {
        lines.iter().find_map(|line| {
            let line = line.as_ref().trim();
            (line.chars().count() >= MIN_UNLABELED_CHARS && NAME_LINE.is_match(line))
                .then(|| ExtractionMatch::new(title_case(line), 0.5, line))
        })
    }
}

impl Default for NameExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for NameExtractor {
    type Output = ExtractionMatch<String>;

    /// Lines are taken from the newline-separated text.
    fn extract(&self, text: &str) -> Option<Self::Output> {
        let lines: Vec<&str> = text.lines().collect();
        self.extract_from_lines(&lines)
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.extract(text).into_iter().collect()
    }
}

/// Letters only once spaces are removed.
fn is_alphabetic_words(text: &str) -> bool {
    let mut letters = text.chars().filter(|c| *c != ' ').peekable();
    letters.peek().is_some() && letters.all(char::is_alphabetic)
}

/// Extract a person name from ordered line texts.
pub fn extract_name<S: AsRef<str>>(lines: &[S]) -> Option<String> {
    NameExtractor::new().extract_from_lines(lines).map(|m| m.value)
}
