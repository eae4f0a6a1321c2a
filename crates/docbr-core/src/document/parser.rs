//! Rule-based document parser turning OCR lines into a [`DocumentRecord`].

use std::time::Instant;

use tracing::{debug, info};

use crate::models::document::{DocumentRecord, DocumentType};
use crate::ocr::{OcrLine, OcrResult};

use super::classifier::DocumentClassifier;
use super::rules::{
    text::only_digits, validate_cnh, validate_cpf, CnhExtractor, CpfExtractor, DateExtractor,
    ExtractionMatch, FieldExtractor, NameExtractor, RgExtractor,
};
use super::{DocumentExtractor, Result};
use crate::error::ExtractionError;

pub const INVALID_CPF: &str = "CPF inválido";
pub const INVALID_CNH: &str = "CNH inválida";

/// Document parser running the classifier and every field extractor.
///
/// Holds no per-request state; one instance can be shared across threads.
pub struct DocumentParser {
    classifier: DocumentClassifier,
    cpf: CpfExtractor,
    rg: RgExtractor,
    cnh: CnhExtractor,
    name: NameExtractor,
    birth_date: DateExtractor,
    validity_date: DateExtractor,
    /// Caller-declared type replacing the inferred one.
    type_override: Option<DocumentType>,
}

impl DocumentParser {
    /// Create a new parser with the default rule sets.
    pub fn new() -> Self {
        Self {
            classifier: DocumentClassifier::new(),
            cpf: CpfExtractor::new(),
            rg: RgExtractor::new(),
            cnh: CnhExtractor::new(),
            name: NameExtractor::new(),
            birth_date: DateExtractor::birth_date(),
            validity_date: DateExtractor::validity_date(),
            type_override: None,
        }
    }

    /// Report `document_type` as given instead of the classified one.
    ///
    /// `None` means automatic detection. Extraction and validation are not affected.
    pub fn with_type_override(mut self, document_type: Option<DocumentType>) -> Self {
        self.type_override = document_type;
        self
    }

    pub fn type_override(&self) -> Option<DocumentType> {
        self.type_override
    }

    /// Extract a document record from ordered OCR lines.
    ///
    /// Never fails: fields that cannot be found are left absent.
    pub fn process(&self, lines: &[OcrLine]) -> DocumentRecord {
        let start = Instant::now();

        let words: Vec<_> = lines.iter().flat_map(|l| l.words.iter()).collect();
        let raw_text: Vec<String> = words.iter().map(|w| w.text.clone()).collect();
        let confidence = if words.is_empty() {
            0.0
        } else {
            let sum: f32 = words.iter().map(|w| w.confidence).sum();
            (sum / words.len() as f32).clamp(0.0, 1.0)
        };
        let full_text = raw_text.join(" ");
        let line_texts: Vec<String> = lines.iter().map(OcrLine::text).collect();

        info!(
            "Extracting document from {} words in {} lines",
            words.len(),
            lines.len()
        );

        let classified = self.classifier.classify(&full_text);
        let document_type = match self.type_override {
            Some(declared) => {
                if declared != classified {
                    debug!("Type override {} replaces classified {}", declared, classified);
                }
                declared
            }
            None => classified,
        };

        let mut record = DocumentRecord {
            document_type,
            name: field("name", self.name.extract_from_lines(&line_texts)),
            birth_date: field("birth_date", self.birth_date.extract(&full_text)),
            rg_number: field("rg_number", self.rg.extract(&full_text)),
            cpf_number: field("cpf_number", self.cpf.extract(&full_text)),
            cnh_number: field("cnh_number", self.cnh.extract(&full_text)),
            cnh_category: None,
            validity_date: field("validity_date", self.validity_date.extract(&full_text)),
            issuing_body: None,
            raw_text,
            confidence,
            is_valid: false,
            validation_errors: Vec::new(),
        };

        record.validation_errors = validation_errors(&record);
        record.is_valid = record.validation_errors.is_empty() && record.has_document_number();

        info!(
            "Extracted {} document in {:?}: valid={}, confidence={:.2}",
            record.document_type,
            start.elapsed(),
            record.is_valid,
            record.confidence
        );

        record
    }
}

impl Default for DocumentParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentExtractor for DocumentParser {
    fn extract(&self, ocr_result: &OcrResult) -> Result<DocumentRecord> {
        if ocr_result.is_empty() {
            return Err(ExtractionError::NoTextDetected);
        }

        Ok(self.process(&ocr_result.lines))
    }

    fn extract_from_text(&self, text: &str) -> DocumentRecord {
        self.process(&OcrResult::from_text(text).lines)
    }
}

fn field(name: &str, found: Option<ExtractionMatch<String>>) -> Option<String> {
    match found {
        Some(m) => {
            debug!(
                "Found {} {:?} (rule confidence {:.2}, matched {:?})",
                name, m.value, m.confidence, m.source
            );
            Some(m.value)
        }
        None => {
            debug!("No {} found", name);
            None
        }
    }
}

/// Re-check the checksummed numbers of a record.
fn validation_errors(record: &DocumentRecord) -> Vec<String> {
    let mut errors = Vec::new();

    if let Some(ref cpf) = record.cpf_number {
        if !validate_cpf(&only_digits(cpf)) {
            errors.push(INVALID_CPF.to_string());
        }
    }

    if let Some(ref cnh) = record.cnh_number {
        if !validate_cnh(cnh) {
            errors.push(INVALID_CNH.to_string());
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::OcrWord;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn line(words: &[(&str, f32)]) -> OcrLine {
        OcrLine::new(words.iter().map(|(t, c)| OcrWord::new(*t, *c)).collect())
    }

    fn assert_is_valid_invariant(record: &DocumentRecord) {
        assert_eq!(
            record.is_valid,
            record.validation_errors.is_empty() && record.has_document_number()
        );
    }

    #[test]
    fn test_cpf_card() {
        let record = DocumentParser::new().process(&[line(&[("CPF", 0.9), ("123.456.789-09", 0.88)])]);

        assert_eq!(record.cpf_number.as_deref(), Some("123.456.789-09"));
        assert_eq!(record.document_type, DocumentType::Cpf);
        assert!((record.confidence - 0.89).abs() < 1e-5);
        assert!(record.is_valid);
        assert!(record.validation_errors.is_empty());
        assert_eq!(record.raw_text, vec!["CPF", "123.456.789-09"]);
    }

    #[test]
    fn test_repeated_digit_cpf_rejected() {
        let record = DocumentParser::new().process(&[line(&[("CPF", 0.9), ("111.111.111-11", 0.9)])]);

        assert_eq!(record.cpf_number, None);
        assert!(record.validation_errors.is_empty());
        assert!(!record.is_valid);
    }

    #[test]
    fn test_name_on_label_line() {
        let record =
            DocumentParser::new().process(&[line(&[("NOME", 0.95), ("MARIA OLIVEIRA COSTA", 0.9)])]);
        assert_eq!(record.name.as_deref(), Some("Maria Oliveira Costa"));
    }

    #[test]
    fn test_identity_card() {
        let lines = vec![
            line(&[("REPUBLICA FEDERATIVA DO BRASIL", 0.97)]),
            line(&[("REGISTRO GERAL", 0.95), ("12.345.678-9", 0.9)]),
            line(&[("NOME", 0.96)]),
            line(&[("MARIA OLIVEIRA COSTA", 0.93)]),
            line(&[("CPF", 0.9), ("529.982.247-25", 0.91)]),
            line(&[("DATA DE NASCIMENTO", 0.9), ("15/05/1985", 0.89)]),
            line(&[("SSP SP", 0.8)]),
        ];
        let record = DocumentParser::new().process(&lines);

        assert_eq!(record.document_type, DocumentType::Rg);
        assert_eq!(record.rg_number.as_deref(), Some("123456789"));
        assert_eq!(record.cpf_number.as_deref(), Some("529.982.247-25"));
        assert_eq!(record.cnh_number, None);
        assert_eq!(record.name.as_deref(), Some("Maria Oliveira Costa"));
        assert_eq!(record.birth_date.as_deref(), Some("15/05/1985"));
        assert_eq!(record.validity_date, None);
        assert_eq!(record.document_number(), Some("123456789"));
        assert!(record.is_valid);
    }

    #[test]
    fn test_driving_license() {
        let lines = vec![
            line(&[("CARTEIRA NACIONAL DE HABILITAÇÃO", 0.95)]),
            line(&[("NOME", 0.9)]),
            line(&[("JOSÉ DA SILVA", 0.9)]),
            line(&[("CNH", 0.9), ("12345678900", 0.9)]),
            line(&[("DATA NASCIMENTO", 0.9), ("15/05/1985", 0.9)]),
        ];
        let record = DocumentParser::new().process(&lines);

        assert_eq!(record.document_type, DocumentType::Cnh);
        assert_eq!(record.cnh_number.as_deref(), Some("12345678900"));
        assert_eq!(record.name.as_deref(), Some("José Da Silva"));
        assert_eq!(record.birth_date.as_deref(), Some("15/05/1985"));
        assert_eq!(record.cnh_category, None);
        assert_eq!(record.issuing_body, None);
        assert!(record.is_valid);
    }

    #[test]
    fn test_dates_are_not_keyword_scoped() {
        // Both keywords resolve to the first date in the text
        let lines = vec![
            line(&[("NASCIMENTO", 0.9), ("15/05/1985", 0.9)]),
            line(&[("VALIDADE", 0.9), ("01/01/2030", 0.9)]),
        ];
        let record = DocumentParser::new().process(&lines);

        assert_eq!(record.birth_date.as_deref(), Some("15/05/1985"));
        assert_eq!(record.validity_date.as_deref(), Some("15/05/1985"));
    }

    #[test]
    fn test_empty_input() {
        let record = DocumentParser::new().process(&[]);

        assert_eq!(record, DocumentRecord::empty());
        assert_eq!(record.confidence, 0.0);
        assert!(record.validation_errors.is_empty());
        assert!(!record.is_valid);
    }

    #[test]
    fn test_lines_without_words() {
        let record = DocumentParser::new().process(&[OcrLine::default(), OcrLine::default()]);
        assert_eq!(record, DocumentRecord::empty());
    }

    #[test]
    fn test_deterministic() {
        let lines = vec![
            line(&[("CNH", 0.8), ("12345678900", 0.7)]),
            line(&[("NOME FULANO DE TAL", 0.9)]),
        ];
        let parser = DocumentParser::new();

        let first = serde_json::to_string(&parser.process(&lines)).unwrap();
        let second = serde_json::to_string(&parser.process(&lines)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_is_valid_invariant() {
        let parser = DocumentParser::new();
        let inputs = vec![
            vec![],
            vec![line(&[("lorem ipsum", 0.5)])],
            vec![line(&[("CPF", 0.9), ("123.456.789-09", 0.9)])],
            vec![line(&[("CNH", 0.9), ("12345678901", 0.9)])],
            vec![line(&[("RG", 0.9), ("12.345.678-9", 0.9)])],
            vec![line(&[("CPF 111.111.111-11", 0.9)])],
        ];

        for lines in &inputs {
            assert_is_valid_invariant(&parser.process(lines));
        }
    }

    #[test]
    fn test_validation_errors() {
        let record = DocumentRecord {
            cpf_number: Some("123.456.789-00".to_string()),
            cnh_number: Some("12345678901".to_string()),
            ..DocumentRecord::default()
        };
        assert_eq!(validation_errors(&record), vec![INVALID_CPF, INVALID_CNH]);

        let record = DocumentRecord {
            cpf_number: Some("123.456.789-09".to_string()),
            cnh_number: Some("98765432109".to_string()),
            ..DocumentRecord::default()
        };
        assert!(validation_errors(&record).is_empty());
    }

    #[test]
    fn test_type_override() {
        let lines = vec![line(&[("CPF", 0.9), ("123.456.789-09", 0.88)])];

        let record = DocumentParser::new()
            .with_type_override(Some(DocumentType::Rg))
            .process(&lines);
        assert_eq!(record.document_type, DocumentType::Rg);
        assert_eq!(record.cpf_number.as_deref(), Some("123.456.789-09"));

        let auto = DocumentParser::new().with_type_override(None).process(&lines);
        assert_eq!(auto.document_type, DocumentType::Cpf);
    }

    #[test]
    fn test_extract_rejects_empty_result() {
        let parser = DocumentParser::new();

        assert_eq!(
            parser.extract(&OcrResult::default()),
            Err(ExtractionError::NoTextDetected)
        );

        let result = OcrResult::new(vec![line(&[("CPF", 0.9), ("123.456.789-09", 0.88)])]);
        assert!(parser.extract(&result).unwrap().is_valid);
    }

    #[test]
    fn test_extract_from_text() {
        let record = DocumentParser::new().extract_from_text("NOME\nPEDRO SANTOS LIMA\nCPF 529.982.247-25\n");

        assert_eq!(record.name.as_deref(), Some("Pedro Santos Lima"));
        assert_eq!(record.cpf_number.as_deref(), Some("529.982.247-25"));
        assert_eq!(record.confidence, 1.0);
    }

    #[tokio::test]
    async fn test_concurrent_extraction() {
        let parser = Arc::new(DocumentParser::new());
        let lines = Arc::new(vec![
            line(&[("CARTEIRA NACIONAL DE HABILITAÇÃO", 0.95)]),
            line(&[("CNH", 0.9), ("98765432109", 0.85)]),
        ]);
        let expected = parser.process(&lines);

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let parser = Arc::clone(&parser);
                let lines = Arc::clone(&lines);
                tokio::spawn(async move { parser.process(&lines) })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap(), expected);
        }
        assert_eq!(expected.cnh_number.as_deref(), Some("98765432109"));
    }
}
