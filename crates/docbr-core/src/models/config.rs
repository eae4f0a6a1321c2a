//! Configuration structures for the docbr tooling.
//!
//! Nothing here changes extraction semantics; it only drives how input is
//! read and how records are written.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DocbrError, InputError};
use crate::ocr::InputFormat;

/// Main configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocbrConfig {
    /// Input handling.
    pub input: InputConfig,

    /// Record output.
    pub output: OutputConfig,

    /// Batch processing.
    pub batch: BatchConfig,
}

/// Input configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Format used when none is given on the command line.
    pub format: InputFormat,

    /// Treat OCR input without any word as an error ("no text found").
    pub reject_empty: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            format: InputFormat::Lines,
            reject_empty: true,
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Record output format.
    pub format: OutputFormat,

    /// Pretty-print JSON.
    pub pretty: bool,

    /// Keep `raw_text` in written records. When false it is emptied.
    pub include_raw_text: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Json,
            pretty: true,
            include_raw_text: true,
        }
    }
}

/// Batch configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Files processed concurrently.
    pub jobs: usize,

    /// Keep going when a file fails.
    pub continue_on_error: bool,

    /// Write a summary CSV next to the outputs.
    pub summary: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            jobs: 4,
            continue_on_error: false,
            summary: false,
        }
    }
}

/// Output format for extracted records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
    Text,
}

impl OutputFormat {
    /// File extension for written records.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "text",
        })
    }
}

impl FromStr for OutputFormat {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "text" | "txt" => Ok(OutputFormat::Text),
            other => Err(InputError::UnknownFormat(other.to_string())),
        }
    }
}

impl DocbrConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| DocbrError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Look up a value by dotted key, e.g. `"batch.jobs"`.
    pub fn get(&self, key: &str) -> crate::Result<serde_json::Value> {
        let json = serde_json::to_value(self)?;

        key.split('.')
            .try_fold(&json, |current, part| current.get(part))
            .cloned()
            .ok_or_else(|| DocbrError::Config(format!("configuration key not found: {}", key)))
    }

    /// Set a value by dotted key. Values that are not valid JSON are taken as strings.
    pub fn set(&mut self, key: &str, value: &str) -> crate::Result<()> {
        let parsed: serde_json::Value = serde_json::from_str(value)
            .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));

        let mut json = serde_json::to_value(&*self)?;
        let (parents, last) = match key.rsplit_once('.') {
            Some((parents, last)) => (Some(parents), last),
            None => (None, key),
        };

        let mut current = &mut json;
        for part in parents.into_iter().flat_map(|p| p.split('.')) {
            current = current
                .get_mut(part)
                .ok_or_else(|| DocbrError::Config(format!("configuration path not found: {}", key)))?;
        }

        let object = current
            .as_object_mut()
            .ok_or_else(|| DocbrError::Config(format!("cannot set value at non-object path: {}", key)))?;
        if !object.contains_key(last) {
            return Err(DocbrError::Config(format!("configuration key not found: {}", key)));
        }
        object.insert(last.to_string(), parsed);

        *self = serde_json::from_value(json)
            .map_err(|e| DocbrError::Config(format!("invalid value for {}: {}", key, e)))?;
        Ok(())
    }
}
