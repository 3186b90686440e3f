//! Ordering questions: the learner arranges items into a sequence.

use serde_json::Value;

use crate::error::{ResolveError, Result};
use crate::normalize::{canonical_text, option_text, option_texts, safe_parse};
use crate::types::ScoreResult;

pub fn score(options: &[Value], stored: &Value, submission: &Value) -> Result<ScoreResult> {
    let expected = expected_sequence(options, stored)?;
    let wanted: Vec<String> = expected
        .iter()
        .map(|text| canonical_text(&Value::String(text.clone())))
        .collect();
    let is_correct = match safe_parse(submission).value {
        Value::Array(items) => {
            items.len() == wanted.len()
                && items.iter().zip(&wanted).all(|(item, want)| canonical_text(item) == *want)
        }
        _ => false,
    };
    let correct_answer = Value::Array(expected.into_iter().map(Value::String).collect());
    Ok(ScoreResult::graded(is_correct, correct_answer))
}

/// The stored order as option texts.
///
/// A list made entirely of JSON integers is an index sequence into the
/// options; anything else is taken as the literal values.
fn expected_sequence(options: &[Value], stored: &Value) -> Result<Vec<String>> {
    let items = match safe_parse(stored).value {
        Value::Array(items) => items,
        Value::Null => return Err(ResolveError::MissingAnswer),
        Value::String(text) if text.trim().is_empty() => return Err(ResolveError::MissingAnswer),
        _ => return Err(ResolveError::InvalidOrderingAnswer),
    };
    if items.is_empty() {
        return Err(ResolveError::MissingAnswer);
    }

    let texts = option_texts(options);
    let is_index_sequence = !texts.is_empty() && items.iter().all(|item| item.is_i64() || item.is_u64());
    if !is_index_sequence {
        return Ok(items.iter().map(option_text).collect());
    }

    items
        .iter()
        .map(|item| {
            let index = item.as_i64().unwrap_or(i64::MAX);
            usize::try_from(index)
                .ok()
                .and_then(|position| texts.get(position))
                .cloned()
                .ok_or(ResolveError::IndexOutOfRange {
                    index,
                    len: texts.len(),
                })
        })
        .collect()
}
