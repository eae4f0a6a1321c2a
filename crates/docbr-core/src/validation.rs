//! Standalone identifier validation, independent of OCR.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::document::rules::{format_cnpj, format_cpf, only_digits, validate_cnh, validate_cnpj, validate_cpf};
use crate::error::ExtractionError;

/// Identifier with a check-digit algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierKind {
    Cpf,
    Cnpj,
    Cnh,
}

impl IdentifierKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentifierKind::Cpf => "cpf",
            IdentifierKind::Cnpj => "cnpj",
            IdentifierKind::Cnh => "cnh",
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdentifierKind {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cpf" => Ok(IdentifierKind::Cpf),
            "cnpj" => Ok(IdentifierKind::Cnpj),
            "cnh" => Ok(IdentifierKind::Cnh),
            other => Err(ExtractionError::UnknownIdentifierKind(other.to_string())),
        }
    }
}

/// Outcome of validating one identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub kind: IdentifierKind,
    /// Value as supplied.
    pub input: String,
    /// Digits only.
    pub cleaned: String,
    pub is_valid: bool,
    /// Canonical punctuation, present only when valid.
    pub formatted: Option<String>,
}

/// Validate an identifier, ignoring any non-digit characters.
pub fn validate(kind: IdentifierKind, raw: &str) -> ValidationOutcome {
    let cleaned = only_digits(raw);

    let is_valid = match kind {
        IdentifierKind::Cpf => validate_cpf(&cleaned),
        IdentifierKind::Cnpj => validate_cnpj(&cleaned),
        IdentifierKind::Cnh => validate_cnh(&cleaned),
    };

    let formatted = is_valid.then(|| match kind {
        IdentifierKind::Cpf => format_cpf(&cleaned),
        IdentifierKind::Cnpj => format_cnpj(&cleaned),
        IdentifierKind::Cnh => cleaned.clone(),
    });

    ValidationOutcome {
        kind,
        input: raw.to_string(),
        cleaned,
        is_valid,
        formatted,
    }
}
