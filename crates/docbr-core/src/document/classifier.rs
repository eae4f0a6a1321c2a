//! Keyword-based document type classification.

use tracing::debug;

use crate::models::document::DocumentType;

/// A classification rule: the type it yields and the keywords that trigger it.
pub type ClassificationRule = (DocumentType, &'static [&'static str]);

const CNH_KEYWORDS: &[&str] = &["CARTEIRA NACIONAL", "HABILITAÇÃO", "CNH", "CONDUTOR"];
const RG_KEYWORDS: &[&str] = &["REGISTRO GERAL", "IDENTIDADE", "RG", "SSP"];
const CPF_KEYWORDS: &[&str] = &["CPF", "CADASTRO DE PESSOA"];

/// Ordered keyword classifier. The first rule with a keyword present wins.
///
/// CNH is checked before RG: driving licenses routinely print the holder's
/// RG as well.
#[derive(Debug, Clone)]
pub struct DocumentClassifier {
    rules: Vec<ClassificationRule>,
}

impl DocumentClassifier {
    pub fn new() -> Self {
        Self {
            rules: vec![
                (DocumentType::Cnh, CNH_KEYWORDS),
                (DocumentType::Rg, RG_KEYWORDS),
                (DocumentType::Cpf, CPF_KEYWORDS),
            ],
        }
    }

    /// Classify text, `Unknown` when no rule matches.
    pub fn classify(&self, text: &str) -> DocumentType {
        self.matching_rule(text)
            .map(|(doc_type, keyword)| {
                debug!("Classified as {} on keyword {:?}", doc_type, keyword);
                doc_type
            })
            .unwrap_or(DocumentType::Unknown)
    }

    /// The type and keyword of the first rule that fires.
    pub fn matching_rule(&self, text: &str) -> Option<(DocumentType, &'static str)> {
        let upper = text.to_uppercase();

        self.rules.iter().find_map(|(doc_type, keywords)| {
            keywords
                .iter()
                .find(|k| upper.contains(*k))
                .map(|k| (*doc_type, *k))
        })
    }

    pub fn rules(&self) -> &[ClassificationRule] {
        &self.rules
    }
}

impl Default for DocumentClassifier {
    fn default() -> Self {
        Self::new()
    }
}
