//! Option-based scoring (mcq, true_false, scenario with options).

use serde_json::{json, Value};

use crate::error::Result;
use crate::normalize::{canonical_text, normalize_str, option_texts};
use crate::resolve::{resolve_option_text, ResolvedOption};
use crate::types::ScoreResult;

/// Options assumed for a true/false question stored without any.
pub fn implicit_true_false() -> Vec<Value> {
    vec![json!("True"), json!("False")]
}

pub fn score(options: &[Value], stored: &Value, submission: &Value) -> Result<ScoreResult> {
    let resolved = resolve_option_text(options, stored)?;
    let is_correct = submission_matches(&resolved, &option_texts(options), submission);
    Ok(
        ScoreResult::graded(is_correct, Value::String(resolved.text.clone()))
            .with_details(json!({ "correct_index": resolved.index })),
    )
}

/// Whether a submission selects the resolved option.
///
/// JSON numbers are indices. Anything else is compared as text; text that
/// equals no option but reads as an integer is treated as an index.
pub fn submission_matches(resolved: &ResolvedOption, texts: &[String], submission: &Value) -> bool {
    if let Value::Number(number) = submission {
        return number.as_f64() == Some(resolved.index as f64);
    }
    let submitted = canonical_text(submission);
    if submitted.is_empty() {
        return false;
    }
    if submitted == normalize_str(&resolved.text) {
        return true;
    }
    if texts.iter().any(|text| normalize_str(text) == submitted) {
        return false;
    }
    submitted
        .parse::<usize>()
        .map(|index| index == resolved.index)
        .unwrap_or(false)
}
