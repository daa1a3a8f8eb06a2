//! Response parsing and validation for raw model output.
//!
//! Model output is not contractually JSON-only — the model may wrap
//! the object in prose or code fences — so extraction takes the first
//! `{` through the last `}` (greedy outermost-brace match) before
//! parsing. Validation then checks only that the six required
//! top-level fields are present; inner shapes pass through untouched.

use serde_json::Value;

use crate::errors::GenerationError;
use crate::models::assessment::AssessmentResult;

/// Extracts and validates an `AssessmentResult` from raw model output.
///
/// Fails with `Parse` when no `{...}` span exists or the span is not
/// valid JSON, and with `Schema(field)` when a required top-level
/// field is missing (or explicitly null).
pub fn parse_result(raw: &str) -> Result<AssessmentResult, GenerationError> {
    let start = raw.find('{').ok_or(GenerationError::Parse)?;
    let end = raw.rfind('}').ok_or(GenerationError::Parse)?;
    if end < start {
        return Err(GenerationError::Parse);
    }

    let value: Value = serde_json::from_str(&raw[start..=end]).map_err(|_| GenerationError::Parse)?;
    let object = value.as_object().ok_or(GenerationError::Parse)?;

    for field in AssessmentResult::REQUIRED_FIELDS {
        if object.get(field).map_or(true, Value::is_null) {
            return Err(GenerationError::Schema(field));
        }
    }

    serde_json::from_value(value).map_err(|_| GenerationError::Parse)
}
