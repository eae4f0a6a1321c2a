//! Identity document data models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;

/// Category of Brazilian identity document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    /// Cadastro de Pessoas Físicas (taxpayer card).
    Cpf,
    /// Registro Geral (state identity card).
    Rg,
    /// Carteira Nacional de Habilitação (driving license).
    Cnh,
    /// Nothing recognizable.
    #[default]
    Unknown,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Cpf => "cpf",
            DocumentType::Rg => "rg",
            DocumentType::Cnh => "cnh",
            DocumentType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cpf" => Ok(DocumentType::Cpf),
            "rg" => Ok(DocumentType::Rg),
            "cnh" => Ok(DocumentType::Cnh),
            "unknown" => Ok(DocumentType::Unknown),
            other => Err(ExtractionError::UnknownDocumentType(other.to_string())),
        }
    }
}

/// Structured result of one extraction run.
///
/// Absent fields serialize as `null`; every key is always present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Inferred (or caller-overridden) document category.
    pub document_type: DocumentType,

    /// Person name, title-cased.
    pub name: Option<String>,

    /// Birth date as printed on the document.
    pub birth_date: Option<String>,

    /// RG number, digits only (7-10).
    pub rg_number: Option<String>,

    /// CPF number formatted as `XXX.XXX.XXX-XX`.
    pub cpf_number: Option<String>,

    /// CNH number, 11 digits.
    pub cnh_number: Option<String>,

    /// License category (A, B, AB, ...). Not extracted yet.
    pub cnh_category: Option<String>,

    /// Validity date as printed on the document.
    pub validity_date: Option<String>,

    /// Issuing body (SSP/SP, DETRAN/RJ, ...). Not extracted yet.
    pub issuing_body: Option<String>,

    /// Every recognized token in OCR order.
    pub raw_text: Vec<String>,

    /// Mean word confidence (0.0 - 1.0).
    pub confidence: f32,

    /// Validation passed and at least one document number was found.
    pub is_valid: bool,

    /// Human-readable validation failures.
    pub validation_errors: Vec<String>,
}

impl DocumentRecord {
    /// A record with every field absent, as reported when no text was found.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when any of the CPF, RG or CNH numbers is present.
    pub fn has_document_number(&self) -> bool {
        self.cpf_number.is_some() || self.rg_number.is_some() || self.cnh_number.is_some()
    }

    /// The number belonging to the document's own type.
    pub fn document_number(&self) -> Option<&str> {
        match self.document_type {
            DocumentType::Cpf => self.cpf_number.as_deref(),
            DocumentType::Rg => self.rg_number.as_deref(),
            DocumentType::Cnh => self.cnh_number.as_deref(),
            DocumentType::Unknown => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_document_type_parsing() {
        assert_eq!("CNH".parse::<DocumentType>().unwrap(), DocumentType::Cnh);
        assert_eq!(" rg ".parse::<DocumentType>().unwrap(), DocumentType::Rg);
        assert!("passport".parse::<DocumentType>().is_err());
    }

    #[test]
    fn test_document_type_serde() {
        assert_eq!(serde_json::to_string(&DocumentType::Cpf).unwrap(), "\"cpf\"");
        assert_eq!(
            serde_json::from_str::<DocumentType>("\"unknown\"").unwrap(),
            DocumentType::Unknown
        );
    }

    #[test]
    fn test_empty_record() {
        let record = DocumentRecord::empty();
        assert_eq!(record.document_type, DocumentType::Unknown);
        assert_eq!(record.confidence, 0.0);
        assert!(!record.is_valid);
        assert!(!record.has_document_number());
        assert_eq!(record.document_number(), None);
    }

    #[test]
    fn test_absent_fields_serialize_as_null() {
        let json = serde_json::to_value(DocumentRecord::empty()).unwrap();
        assert!(json["cpf_number"].is_null());
        assert!(json["cnh_category"].is_null());
        assert_eq!(json["raw_text"], serde_json::json!([]));
        assert_eq!(json["document_type"], "unknown");
    }

    #[test]
    fn test_document_number_follows_type() {
        let record = DocumentRecord {
            document_type: DocumentType::Rg,
            rg_number: Some("123456789".to_string()),
            cpf_number: Some("123.456.789-09".to_string()),
            ..DocumentRecord::default()
        };
        assert_eq!(record.document_number(), Some("123456789"));
    }
}
