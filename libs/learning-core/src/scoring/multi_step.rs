//! Scaffolded multi-step questions.
//!
//! A scaffolded question carries `assets.steps`, an ordered list of
//! sub-questions each with its own options and answer. The submission is
//! `{"stepAnswers": {"0": .., "1": ..}}` and every step must be right.

use serde_json::{json, Map, Value};

use super::{choice, ScoringConfig};
use crate::error::{ResolveError, Result};
use crate::normalize::{
    canonical_text, extract_options, is_blank, normalize_str, option_text, option_texts, safe_parse,
};
use crate::resolve::{resolve_option_text, ResolvedOption};
use crate::types::ScoreResult;

/// Steps from `assets.steps`, or `None` when the question is not scaffolded.
pub fn scaffold_steps(assets: &Value) -> Option<Vec<Value>> {
    let assets = safe_parse(assets).value;
    match safe_parse(assets.get("steps")?).value {
        Value::Array(steps) if !steps.is_empty() => Some(steps),
        _ => None,
    }
}

/// Correct value of one step.
enum StepKey {
    Choice {
        resolved: ResolvedOption,
        texts: Vec<String>,
    },
    Text { display: String, canonical: String },
}

impl StepKey {
    fn resolve(step: &Value) -> Result<Self> {
        let step = safe_parse(step).value;
        let answer = ["answer", "correctAnswer", "correct_answer"]
            .iter()
            .find_map(|key| step.get(*key))
            .cloned()
            .unwrap_or(Value::Null);
        let options = extract_options(step.get("options").unwrap_or(&Value::Null));

        if !options.is_empty() {
            let resolved = resolve_option_text(&options, &answer)?;
            return Ok(Self::Choice {
                resolved,
                texts: option_texts(&options),
            });
        }
        let decoded = safe_parse(&answer).value;
        if is_blank(&decoded) {
            return Err(ResolveError::MissingAnswer);
        }
        Ok(Self::Text {
            display: option_text(&decoded),
            canonical: canonical_text(&answer),
        })
    }

    fn display(&self) -> Value {
        match self {
            Self::Choice { resolved, .. } => Value::String(resolved.text.clone()),
            Self::Text { display, .. } => Value::String(display.clone()),
        }
    }

    fn accepts(&self, submission: &Value) -> bool {
        match self {
            Self::Choice { resolved, texts } => choice::submission_matches(resolved, texts, submission),
            Self::Text { canonical, .. } => canonical_text(submission) == *canonical,
        }
    }
}

/// Per-step answers as submitted.
enum StepAnswers {
    Keyed(Map<String, Value>),
    Listed(Vec<Value>),
    Empty,
}

impl StepAnswers {
    fn from_submission(submission: Value) -> Self {
        let inner = match &submission {
            Value::Object(map) => map
                .get("stepAnswers")
                .or_else(|| map.get("step_answers"))
                .map(|answers| safe_parse(answers).value),
            _ => None,
        };
        match inner.unwrap_or(submission) {
            Value::Object(map) => Self::Keyed(map),
            Value::Array(items) => Self::Listed(items),
            _ => Self::Empty,
        }
    }

    fn get(&self, step: usize) -> Option<&Value> {
        match self {
            Self::Keyed(map) => map.get(&step.to_string()),
            Self::Listed(items) => items.get(step),
            Self::Empty => None,
        }
    }
}

pub fn score(config: &ScoringConfig, stored: &Value, steps: &[Value], submission: &Value) -> Result<ScoreResult> {
    let keys = steps
        .iter()
        .enumerate()
        .map(|(step, raw)| {
            StepKey::resolve(raw).map_err(|source| ResolveError::InvalidStep {
                step,
                source: Box::new(source),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let correct_answer = Value::Array(keys.iter().map(StepKey::display).collect());

    let submission = safe_parse(submission).value;
    let sentinel = normalize_str(&config.completed_sentinel);
    if let Value::String(text) = &submission {
        if normalize_str(text) == sentinel {
            let is_correct = canonical_text(stored) == sentinel;
            return Ok(ScoreResult::graded(is_correct, correct_answer)
                .with_details(json!({ "legacy_completion": true })));
        }
    }

    let answers = StepAnswers::from_submission(submission);
    let results: Vec<Value> = keys
        .iter()
        .enumerate()
        .map(|(step, key)| {
            let correct = answers.get(step).map(|given| key.accepts(given)).unwrap_or(false);
            json!({ "index": step, "correct": correct })
        })
        .collect();
    let is_correct = results.iter().all(|result| result["correct"] == Value::Bool(true));

    Ok(ScoreResult::graded(is_correct, correct_answer).with_details(json!({ "steps": results })))
}
