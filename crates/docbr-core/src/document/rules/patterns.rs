//! Common regex patterns for Brazilian identity document extraction.
//!
//! Patterns marked as uppercase-only are matched against the uppercased text.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // CPF (taxpayer registry) patterns
    pub static ref ELEVEN_DIGITS: Regex = Regex::new(r"[0-9]{11}").unwrap();

    pub static ref CPF_FORMATTED: Regex = Regex::new(
        r"[0-9]{3}[.\s]?[0-9]{3}[.\s]?[0-9]{3}[-\s]?[0-9]{2}"
    ).unwrap();

    // RG (general registry) patterns, uppercase-only
    pub static ref RG_LABELED: Regex = Regex::new(
        r"RG[\s:]*([0-9]{1,2}[.\s]?[0-9]{3}[.\s]?[0-9]{3}[-\s]?[0-9]{1,2})"
    ).unwrap();

    pub static ref RG_REGISTRO_GERAL: Regex = Regex::new(
        r"REGISTRO GERAL[\s:]*([0-9]{7,10})"
    ).unwrap();

    pub static ref RG_STANDALONE: Regex = Regex::new(
        r"([0-9]{1,2}[.\s]?[0-9]{3}[.\s]?[0-9]{3}[-\s]?[0-9]{1,2})"
    ).unwrap();

    // CNH (driving license) patterns, uppercase-only
    pub static ref CNH_LABELED: Regex = Regex::new(
        r"CNH[\s:]*([0-9]{11})"
    ).unwrap();

    pub static ref CNH_REGISTRO: Regex = Regex::new(
        r"N[º°]?\s*REGISTRO[\s:]*([0-9]{11})"
    ).unwrap();

    pub static ref CNH_STANDALONE: Regex = Regex::new(
        r"([0-9]{11})"
    ).unwrap();

    // Name patterns
    pub static ref NAME_TRAILER: Regex = Regex::new(
        r"(?s)\b(?:CPF|RG|DOC|DATA|NASC).*"
    ).unwrap();

    pub static ref NAME_LINE: Regex = Regex::new(
        r"^[A-Za-zÀ-ÿ\s]+$"
    ).unwrap();

    // Date patterns (DD/MM/YYYY, DD-MM-YY, DD.MM.YYYY ...)
    pub static ref DATE_DMY_LONG: Regex = Regex::new(
        r"[0-9]{2}[/\-.][0-9]{2}[/\-.][0-9]{4}"
    ).unwrap();

    pub static ref DATE_DMY_SHORT: Regex = Regex::new(
        r"[0-9]{2}[/\-.][0-9]{2}[/\-.][0-9]{2}"
    ).unwrap();
}
