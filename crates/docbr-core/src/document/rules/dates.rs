//! Date extraction for identity documents.
//!
//! Dates are returned exactly as printed (`DD/MM/YYYY`, `DD-MM-YY`,
//! `DD.MM.YYYY`, separators may be mixed); no calendar validation is done.

use tracing::debug;

use super::patterns::{DATE_DMY_LONG, DATE_DMY_SHORT};
use super::{ExtractionMatch, FieldExtractor};

/// Keywords that mark a birth date.
pub const BIRTH_DATE_KEYWORDS: [&str; 3] = ["NASCIMENTO", "NASC", "DATA DE NASCIMENTO"];

/// Keywords that mark a validity/expiry date.
pub const VALIDITY_DATE_KEYWORDS: [&str; 3] = ["VALIDADE", "VALID", "VENCIMENTO"];

/// Date field extractor triggered by keywords.
///
/// The keyword only has to appear somewhere in the text; the date itself is
/// searched in the whole text, four-digit years first.
pub struct DateExtractor {
    keywords: Vec<String>,
}

impl DateExtractor {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_uppercase())
                .collect(),
        }
    }

    pub fn birth_date() -> Self {
        Self::new(BIRTH_DATE_KEYWORDS)
    }

    pub fn validity_date() -> Self {
        Self::new(VALIDITY_DATE_KEYWORDS)
    }

    fn triggered(&self, text: &str) -> Option<&str> {
        let upper = text.to_uppercase();
        self.keywords
            .iter()
            .find(|k| upper.contains(k.as_str()))
            .map(String::as_str)
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let Some(keyword) = self.triggered(text) else {
            return Vec::new();
        };
        debug!("Date keyword {:?} present, scanning for dates", keyword);

        let mut results: Vec<Self::Output> = Vec::new();

        for (pattern, confidence) in [(&*DATE_DMY_LONG, 0.9), (&*DATE_DMY_SHORT, 0.7)] {
            for m in pattern.find_iter(text) {
                // A short-year match inside a long-year date is the same date
                let overlaps = results.iter().any(|r| {
                    r.position
                        .is_some_and(|(start, end)| m.start() < end && start < m.end())
                });
                if overlaps || results.iter().any(|r| r.value == m.as_str()) {
                    continue;
                }
                results.push(
                    ExtractionMatch::new(m.as_str().to_string(), confidence, m.as_str())
                        .with_position(m.start(), m.end()),
                );
            }
        }

        results
    }
}

/// Extract the first date in `text` when any of `keywords` is present.
pub fn extract_date<S: AsRef<str>>(text: &str, keywords: &[S]) -> Option<String> {
    DateExtractor::new(keywords).extract(text).map(|m| m.value)
}
