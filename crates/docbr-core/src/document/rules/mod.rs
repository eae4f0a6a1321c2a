//! Rule-based field extractors and check-digit validators for Brazilian documents.

pub mod cnh;
pub mod cnpj;
pub mod cpf;
pub mod dates;
pub mod name;
pub mod patterns;
pub mod rg;
pub mod text;

pub use cnh::{extract_cnh, validate_cnh, CnhExtractor};
pub use cnpj::{format_cnpj, validate_cnpj};
pub use cpf::{extract_cpf, format_cpf, validate_cpf, CpfExtractor};
pub use dates::{extract_date, DateExtractor, BIRTH_DATE_KEYWORDS, VALIDITY_DATE_KEYWORDS};
pub use name::{extract_name, NameExtractor, NAME_LABELS};
pub use rg::{extract_rg, RgExtractor};
pub use text::{only_digits, title_case};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field, best rule first.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// Extraction context with confidence scores.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Rule confidence (0.0 - 1.0); labeled rules score higher than bare fallbacks.
    pub confidence: f32,
    /// Position in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, confidence: f32, source: impl Into<String>) -> Self {
        Self {
            value,
            confidence,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
