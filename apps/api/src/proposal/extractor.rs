//! Extractor: pulls the JSON object out of free-form model output.
//!
//! The model is asked for JSON only, but in practice wraps it in prose or
//! markdown fences. Fence lines are removed first, then the span from the
//! first `{` to the last `}` is parsed. Backticks inside JSON string values
//! are left alone.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

static FENCE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*```[\w+-]*[ \t\r]*$").expect("fence line regex is valid")
});

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("no JSON object found in model output")]
    NoObject,

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Extracts a single JSON object from `text`.
pub fn extract_object(text: &str) -> Result<Value, ExtractionError> {
    let text = strip_fences(text);

    let start = text.find('{').ok_or(ExtractionError::NoObject)?;
    let end = text.rfind('}').ok_or(ExtractionError::NoObject)?;
    if end < start {
        return Err(ExtractionError::NoObject);
    }

    // The span opens with `{`, so a successful parse is always an object.
    Ok(serde_json::from_str(&text[start..=end])?)
}

/// Removes lines that consist of a ```json / ``` marker alone.
fn strip_fences(text: &str) -> std::borrow::Cow<'_, str> {
    FENCE_LINE.replace_all(text, "")
}
