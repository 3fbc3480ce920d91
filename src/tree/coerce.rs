//! Conversion of patch text into typed values.

use crate::error::PatchError;
use crate::value::{from_yaml, Value};

/// Converts the text of a patch into a [`Value`].
///
/// Verbatim text is always stored as a string. Otherwise the text is decoded
/// as an unquoted YAML/JSON literal: `true`/`false`, numbers, `null` or
/// empty text, and flow or block structures. Text that is none of those
/// stays a string. Text that starts a structure but does not decode is a
/// coercion error.
pub fn coerce(text: &str, verbatim: bool) -> Result<Value, PatchError> {
    if verbatim {
        return Ok(Value::String(text.to_string()));
    }
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }

    match from_yaml(text) {
        // A block scalar (`|` or `>`) carries nested structure as its body.
        Ok(Value::String(body)) if starts_block_scalar(text) => {
            if body.trim().is_empty() {
                return Ok(Value::Null);
            }
            from_yaml(&body).map_err(|e| PatchError::coercion(text, e.to_string()))
        }
        Ok(value) => Ok(value),
        Err(e) if looks_structured(text) => Err(PatchError::coercion(text, e.to_string())),
        Err(_) => Ok(Value::String(text.to_string())),
    }
}

fn starts_block_scalar(text: &str) -> bool {
    let trimmed = text.trim_start();
    trimmed.starts_with('|') || trimmed.starts_with('>')
}

fn looks_structured(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.starts_with('{')
        || trimmed.starts_with('[')
        || trimmed.starts_with("- ")
        || starts_block_scalar(trimmed)
        || trimmed.contains('\n')
        || trimmed.contains(": ")
}
