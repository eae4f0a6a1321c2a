//! Identity document field extraction module.

pub mod classifier;
mod parser;
pub mod rules;

pub use classifier::DocumentClassifier;
pub use parser::{DocumentParser, INVALID_CNH, INVALID_CPF};

use crate::error::ExtractionError;
use crate::models::document::DocumentRecord;
use crate::ocr::OcrResult;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for document extractors.
pub trait DocumentExtractor {
    /// Extract a document record from OCR output.
    ///
    /// Fails with [`ExtractionError::NoTextDetected`] when the engine
    /// recognized no words.
    fn extract(&self, ocr_result: &OcrResult) -> Result<DocumentRecord>;

    /// Extract a document record from plain text, one OCR line per text line.
    fn extract_from_text(&self, text: &str) -> DocumentRecord;
}
