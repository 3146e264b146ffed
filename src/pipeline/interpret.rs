//! Parses the model's raw text into an [`AnalysisResult`].
//!
//! The model is instructed to answer with fenced JSON, but responses drift:
//! commentary around the fence, a missing fence, trailing prose. The
//! interpreter tries the fenced block, then the whole text, then the first
//! brace-delimited substring, and on every path checks for the model's
//! rejection sentinel before anything else, so a rejected document is never
//! misreported as a parse failure. Nothing is fabricated: the structured
//! shape returned is exactly what the model produced.

use regex::Regex;
use serde_json::Value;

use crate::analysis::AnalysisResult;
use crate::pipeline::PipelineError;

/// Value of the `error` field the model uses to self-report a rejection.
pub const REJECTION_SENTINEL: &str = "INVALID_DOCUMENT";

/// Parse a raw model response.
pub fn interpret(raw: &str) -> Result<AnalysisResult, PipelineError> {
    let candidate = fenced_block(raw).unwrap_or_else(|| raw.trim());

    match serde_json::from_str::<Value>(candidate) {
        Ok(value) => finish(value),
        Err(parse_err) => {
            // Best-effort recovery: first top-level brace-delimited substring.
            if let Some(slice) = brace_substring(raw) {
                if let Ok(value) = serde_json::from_str::<Value>(slice) {
                    return finish(value);
                }
            }
            Err(PipelineError::MalformedResponse(parse_err.to_string()))
        }
    }
}

/// Check the sentinel, then deserialize the analysis shape.
fn finish(value: Value) -> Result<AnalysisResult, PipelineError> {
    if let Some(reason) = rejection_reason(&value) {
        return Err(PipelineError::InvalidDocument {
            detected: detected_label(&reason),
        });
    }

    serde_json::from_value::<AnalysisResult>(value)
        .map_err(|e| PipelineError::MalformedResponse(e.to_string()))
}

/// The `reason` text if `value` carries the rejection sentinel.
fn rejection_reason(value: &Value) -> Option<String> {
    let object = value.as_object()?;
    if object.get("error")?.as_str()? != REJECTION_SENTINEL {
        return None;
    }
    Some(
        object
            .get("reason")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    )
}

/// Pull the human-readable document-type label out of a rejection reason via
/// the "detected: X" pattern.
fn detected_label(reason: &str) -> Option<String> {
    let pattern = Regex::new(r"(?i)detected:\s*([^)\n]+)").expect("valid regex");
    pattern
        .captures(reason)
        .map(|captures| captures[1].trim().to_string())
        .filter(|label| !label.is_empty())
}

/// Inner content of the first fenced code block, skipping a language tag.
fn fenced_block(raw: &str) -> Option<&str> {
    let start = raw.find("```")?;
    let after = &raw[start + 3..];
    let body_start = after.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &after[body_start..];
    let end = body.find("```")?;
    Some(body[..end].trim())
}

/// Substring from the first `{` to the last `}`.
fn brace_substring(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}
