//! Image labelling: each target on an image carries a label.

use serde_json::{Map, Value};

use crate::error::{ResolveError, Result};
use crate::normalize::{canonical_text, safe_parse};
use crate::types::ScoreResult;

pub fn score(stored: &Value, assets: &Value, submission: &Value) -> Result<ScoreResult> {
    let expected = answer_map(stored, assets).ok_or(ResolveError::MissingAnswerMap)?;

    let submitted = match safe_parse(submission).value {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    let labels: Map<String, Value> = expected
        .iter()
        .map(|(target, label)| {
            let matched = submitted
                .get(target)
                .map(|given| canonical_text(given) == canonical_text(label))
                .unwrap_or(false);
            (target.clone(), Value::Bool(matched))
        })
        .collect();
    let is_correct = labels.values().all(|matched| matched == &Value::Bool(true));

    let mut details = Map::new();
    details.insert("labels".to_string(), Value::Object(labels));
    Ok(ScoreResult::graded(is_correct, Value::Object(expected)).with_details(Value::Object(details)))
}

/// Target-id to label mapping from the answer field, falling back to
/// `assets.answer`. Empty mappings count as missing.
fn answer_map(stored: &Value, assets: &Value) -> Option<Map<String, Value>> {
    non_empty_object(stored).or_else(|| {
        let assets = safe_parse(assets).value;
        assets.get("answer").and_then(non_empty_object)
    })
}

fn non_empty_object(value: &Value) -> Option<Map<String, Value>> {
    match safe_parse(value).value {
        Value::Object(map) if !map.is_empty() => Some(map),
        _ => None,
    }
}
