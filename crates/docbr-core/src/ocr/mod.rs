//! OCR engine output model.
//!
//! The OCR engine itself is an external collaborator. This module only
//! describes what it hands over: ordered lines of recognized words, each
//! with a confidence score.

mod paddle;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{InputError, Result};

/// A single recognized text token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawWord")]
pub struct OcrWord {
    /// Recognized text.
    pub text: String,

    /// Recognition confidence (0.0 - 1.0).
    pub confidence: f32,
}

impl OcrWord {
    /// Create a word, clamping the confidence into [0, 1].
    ///
    /// Non-finite confidences are treated as 0.0.
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };

        Self {
            text: text.into(),
            confidence,
        }
    }

    /// Create a word, rejecting confidences outside [0, 1].
    pub fn try_new(text: impl Into<String>, confidence: f64) -> std::result::Result<Self, InputError> {
        let text = text.into();
        if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
            return Err(InputError::InvalidConfidence {
                text,
                value: confidence,
            });
        }

        Ok(Self {
            text,
            confidence: confidence as f32,
        })
    }
}

/// Wire forms accepted for a word: `{"text": "..", "confidence": 0.9}` or `["..", 0.9]`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawWord {
    Object { text: String, confidence: f64 },
    Tuple(String, f64),
}

impl TryFrom<RawWord> for OcrWord {
    type Error = InputError;

    fn try_from(raw: RawWord) -> std::result::Result<Self, Self::Error> {
        match raw {
            RawWord::Object { text, confidence } | RawWord::Tuple(text, confidence) => {
                OcrWord::try_new(text, confidence)
            }
        }
    }
}

/// Ordered words occupying one visual line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OcrLine {
    pub words: Vec<OcrWord>,
}

impl OcrLine {
    pub fn new(words: Vec<OcrWord>) -> Self {
        Self { words }
    }

    /// Line text: word texts joined by single spaces.
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl From<Vec<OcrWord>> for OcrLine {
    fn from(words: Vec<OcrWord>) -> Self {
        Self::new(words)
    }
}

/// Complete OCR output for one document image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OcrResult {
    pub lines: Vec<OcrLine>,
}

impl OcrResult {
    pub fn new(lines: Vec<OcrLine>) -> Self {
        Self { lines }
    }

    /// Build a result from plain text.
    ///
    /// Every non-blank line becomes one line holding a single word with
    /// confidence 1.0.
    pub fn from_text(text: &str) -> Self {
        let lines = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|l| OcrLine::new(vec![OcrWord::new(l, 1.0)]))
            .collect();

        Self { lines }
    }

    /// Parse engine output in the given format.
    pub fn parse(format: InputFormat, input: &str) -> Result<Self> {
        match format {
            InputFormat::Lines => Ok(serde_json::from_str(input)?),
            InputFormat::Paddle => paddle::parse_paddle_output(input),
            InputFormat::Text => Ok(Self::from_text(input)),
        }
    }

    /// All words across all lines, in order.
    pub fn words(&self) -> impl Iterator<Item = &OcrWord> {
        self.lines.iter().flat_map(|l| l.words.iter())
    }

    pub fn word_count(&self) -> usize {
        self.lines.iter().map(|l| l.words.len()).sum()
    }

    /// True when the engine recognized no words at all.
    pub fn is_empty(&self) -> bool {
        self.word_count() == 0
    }

    /// Word texts joined by single spaces, across line boundaries.
    pub fn full_text(&self) -> String {
        self.words()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn line_texts(&self) -> Vec<String> {
        self.lines.iter().map(OcrLine::text).collect()
    }
}

impl From<Vec<OcrLine>> for OcrResult {
    fn from(lines: Vec<OcrLine>) -> Self {
        Self::new(lines)
    }
}

/// Supported shapes of OCR engine output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputFormat {
    /// `[[word, ...], ...]` where a word is an object or a `[text, confidence]` pair.
    #[default]
    Lines,
    /// Raw PaddleOCR output: `[[bbox, [text, confidence]], ...]`.
    Paddle,
    /// Plain text, one line per row.
    Text,
}

impl FromStr for InputFormat {
    type Err = InputError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lines" | "json" => Ok(InputFormat::Lines),
            "paddle" | "paddleocr" => Ok(InputFormat::Paddle),
            "text" | "txt" => Ok(InputFormat::Text),
            other => Err(InputError::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputFormat::Lines => write!(f, "lines"),
            InputFormat::Paddle => write!(f, "paddle"),
            InputFormat::Text => write!(f, "text"),
        }
    }
}
