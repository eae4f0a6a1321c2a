//! Core library for Brazilian identity document extraction.
//!
//! This crate provides:
//! - OCR engine output model (word/line level, PaddleOCR page output)
//! - CPF, CNPJ and CNH check-digit validation
//! - CPF, RG, CNH, name and date extraction from recognized text
//! - Keyword-based document type classification (CPF, RG, CNH)

pub mod document;
pub mod error;
pub mod models;
pub mod ocr;
pub mod validation;

pub use document::{DocumentClassifier, DocumentExtractor, DocumentParser};
pub use error::{DocbrError, ExtractionError, InputError, Result};
pub use models::config::{DocbrConfig, OutputFormat};
pub use models::document::{DocumentRecord, DocumentType};
pub use ocr::{InputFormat, OcrLine, OcrResult, OcrWord};
pub use validation::{validate, IdentifierKind, ValidationOutcome};
