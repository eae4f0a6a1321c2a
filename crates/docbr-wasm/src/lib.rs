//! WASM bindings for Brazilian identity document extraction.
//!
//! The OCR engine runs elsewhere (browser-side or remote); these bindings
//! take its line/word output and return the extracted document record.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use docbr_core::document::rules;
use docbr_core::{
    DocumentClassifier, DocumentExtractor, DocumentParser, DocumentType, IdentifierKind, OcrLine,
    OcrResult, OcrWord,
};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    // json_compatible keeps absent fields as null instead of undefined
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn parse_lines(lines: JsValue) -> Result<OcrResult, JsValue> {
    serde_wasm_bindgen::from_value(lines).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn parse_override(document_type: &str) -> Result<Option<DocumentType>, JsValue> {
    if document_type.eq_ignore_ascii_case("auto") {
        return Ok(None);
    }

    document_type
        .parse::<DocumentType>()
        .map(Some)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn extract_with(parser: &DocumentParser, result: &OcrResult) -> Result<JsValue, JsValue> {
    let record = parser
        .extract(result)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    to_js(&record)
}

/// Extract a document record from OCR lines.
///
/// `lines` is an array of lines, each an array of `[text, confidence]`
/// pairs or `{text, confidence}` objects. Throws when no word was recognized.
#[wasm_bindgen]
pub fn extract_document(lines: JsValue) -> Result<JsValue, JsValue> {
    extract_with(&DocumentParser::new(), &parse_lines(lines)?)
}

/// Extract a document record, reporting `document_type` as declared
/// (`"auto"` classifies from the text).
#[wasm_bindgen]
pub fn extract_document_with_type(lines: JsValue, document_type: &str) -> Result<JsValue, JsValue> {
    let parser = DocumentParser::new().with_type_override(parse_override(document_type)?);
    extract_with(&parser, &parse_lines(lines)?)
}

/// Extract a document record from plain text, one line per OCR line.
#[wasm_bindgen]
pub fn extract_document_from_text(text: &str) -> Result<JsValue, JsValue> {
    to_js(&DocumentParser::new().extract_from_text(text))
}

/// Validate a CPF (individual taxpayer number).
#[wasm_bindgen]
pub fn validate_cpf(cpf: &str) -> bool {
    rules::validate_cpf(cpf)
}

/// Validate a CNPJ (company taxpayer number).
#[wasm_bindgen]
pub fn validate_cnpj(cnpj: &str) -> bool {
    rules::validate_cnpj(cnpj)
}

/// Validate a CNH (driving license number).
#[wasm_bindgen]
pub fn validate_cnh(cnh: &str) -> bool {
    rules::validate_cnh(cnh)
}

/// Validate an identifier of the given kind (`cpf`, `cnpj` or `cnh`).
///
/// Returns `{kind, input, cleaned, is_valid, formatted}`.
#[wasm_bindgen]
pub fn validate_identifier(kind: &str, value: &str) -> Result<JsValue, JsValue> {
    let kind = kind
        .parse::<IdentifierKind>()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    to_js(&docbr_core::validate(kind, value))
}

/// OCR lines built word by word from browser-side OCR.
#[wasm_bindgen]
pub struct OcrLinesJs {
    lines: Vec<OcrLine>,
    current: Vec<OcrWord>,
}

#[wasm_bindgen]
impl OcrLinesJs {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            current: Vec::new(),
        }
    }

    /// Add a word to the current line. Confidence is clamped into [0, 1].
    #[wasm_bindgen]
    pub fn add_word(&mut self, text: &str, confidence: f32) {
        self.current.push(OcrWord::new(text, confidence));
    }

    /// Close the current line.
    #[wasm_bindgen]
    pub fn end_line(&mut self) {
        if !self.current.is_empty() {
            self.lines.push(OcrLine::new(std::mem::take(&mut self.current)));
        }
    }

    #[wasm_bindgen]
    pub fn line_count(&self) -> usize {
        self.lines.len() + usize::from(!self.current.is_empty())
    }

    #[wasm_bindgen]
    pub fn word_count(&self) -> usize {
        self.lines.iter().map(|l| l.words.len()).sum::<usize>() + self.current.len()
    }

    /// Extract a document record; an unfinished line is included.
    #[wasm_bindgen]
    pub fn extract(&self) -> Result<JsValue, JsValue> {
        extract_with(&DocumentParser::new(), &self.to_result())
    }

    fn to_result(&self) -> OcrResult {
        let mut lines = self.lines.clone();
        if !self.current.is_empty() {
            lines.push(OcrLine::new(self.current.clone()));
        }
        OcrResult::new(lines)
    }
}

impl Default for OcrLinesJs {
    fn default() -> Self {
        Self::new()
    }
}

/// Utilities for working with Brazilian document data.
#[wasm_bindgen]
pub struct DocumentUtils;

#[wasm_bindgen]
impl DocumentUtils {
    /// Format CPF as XXX.XXX.XXX-XX.
    #[wasm_bindgen]
    pub fn format_cpf(cpf: &str) -> String {
        rules::format_cpf(cpf)
    }

    /// Format CNPJ as XX.XXX.XXX/XXXX-XX.
    #[wasm_bindgen]
    pub fn format_cnpj(cnpj: &str) -> String {
        rules::format_cnpj(cnpj)
    }

    /// Classify text as `cpf`, `rg`, `cnh` or `unknown`.
    #[wasm_bindgen]
    pub fn classify(text: &str) -> String {
        DocumentClassifier::new().classify(text).to_string()
    }
}
