//! PaddleOCR raw output adapter.

use serde_json::Value;
use tracing::debug;

use super::{OcrLine, OcrResult, OcrWord};
use crate::error::{InputError, Result};

/// Parse the JSON PaddleOCR produces for a page.
///
/// Each detection has the shape `[bbox, [text, confidence]]` and becomes one
/// line holding one word. The per-image wrapper (`[[detection, ...]]`, or
/// `[null]` when nothing was detected) is accepted too; only the first page
/// is used.
pub(super) fn parse_paddle_output(input: &str) -> Result<OcrResult> {
    let value: Value = serde_json::from_str(input)?;

    let top = value
        .as_array()
        .ok_or_else(|| InputError::Malformed("expected a JSON array".to_string()))?;

    let detections: &[Value] = if top.is_empty() || top.iter().all(is_detection) {
        top
    } else {
        match &top[0] {
            Value::Null => &[],
            Value::Array(page) => page,
            _ => {
                return Err(InputError::Malformed(
                    "expected a list of [bbox, [text, confidence]] detections".to_string(),
                )
                .into());
            }
        }
    };

    let mut lines = Vec::with_capacity(detections.len());
    for (i, detection) in detections.iter().enumerate() {
        lines.push(OcrLine::new(vec![parse_detection(i, detection)?]));
    }

    debug!("Parsed {} PaddleOCR detections", lines.len());

    Ok(OcrResult::new(lines))
}

fn is_detection(value: &Value) -> bool {
    recognition(value).is_some()
}

fn recognition(value: &Value) -> Option<(&str, f64)> {
    let pair = value.as_array()?;
    if pair.len() != 2 {
        return None;
    }
    let rec = pair[1].as_array()?;
    let text = rec.first()?.as_str()?;
    let confidence = rec.get(1)?.as_f64()?;
    Some((text, confidence))
}

fn parse_detection(index: usize, value: &Value) -> std::result::Result<OcrWord, InputError> {
    let (text, confidence) = recognition(value).ok_or_else(|| {
        InputError::Malformed(format!("detection {} is not [bbox, [text, confidence]]", index))
    })?;
    OcrWord::try_new(text, confidence)
}
