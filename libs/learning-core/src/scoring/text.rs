//! Free-text fallback scoring.

use serde_json::Value;

use crate::error::{ResolveError, Result};
use crate::normalize::{canonical_text, is_blank, safe_parse};
use crate::types::ScoreResult;

/// Normalized text equality. A stored list holds alternative accepted answers.
pub fn score(stored: &Value, submission: &Value) -> Result<ScoreResult> {
    let correct = safe_parse(stored).value;
    let accepted: Vec<String> = match &correct {
        Value::Array(items) => items
            .iter()
            .filter(|item| !is_blank(item))
            .map(canonical_text)
            .collect(),
        other if is_blank(other) => Vec::new(),
        other => vec![canonical_text(other)],
    };
    if accepted.is_empty() {
        return Err(ResolveError::MissingAnswer);
    }

    let submitted = canonical_text(submission);
    let is_correct = !submitted.is_empty() && accepted.contains(&submitted);
    Ok(ScoreResult::graded(is_correct, correct))
}
