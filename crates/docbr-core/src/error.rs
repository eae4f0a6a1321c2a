//! Error types for the docbr-core library.
//!
//! Document content problems (missing fields, failed checksums) are never
//! errors: they end up as absent fields or entries in
//! [`DocumentRecord::validation_errors`](crate::DocumentRecord). The types
//! here cover malformed input shapes, I/O and boundary conditions.

use thiserror::Error;

/// Main error type for the docbr library.
#[derive(Error, Debug)]
pub enum DocbrError {
    /// Malformed OCR input.
    #[error("input error: {0}")]
    Input(#[from] InputError),

    /// Extraction boundary condition.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to the shape of OCR engine output.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    /// A word confidence is outside [0, 1] or not a finite number.
    #[error("invalid confidence {value} for word {text:?}")]
    InvalidConfidence { text: String, value: f64 },

    /// The payload does not have the expected structure.
    #[error("malformed OCR output: {0}")]
    Malformed(String),

    /// Unknown input or output format name.
    #[error("unknown format: {0}")]
    UnknownFormat(String),
}

/// Errors raised at the extraction boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The OCR engine recognized no words at all.
    #[error("no text found in OCR input")]
    NoTextDetected,

    /// Unknown document type name supplied by the caller.
    #[error("unknown document type: {0}")]
    UnknownDocumentType(String),

    /// Unknown identifier kind supplied by the caller.
    #[error("unknown identifier kind: {0}")]
    UnknownIdentifierKind(String),
}

/// Result type for the docbr library.
pub type Result<T> = std::result::Result<T, DocbrError>;
