//! Resolution of a stored "correct answer" against an option list.
//!
//! The stored value is classified into a [`StoredAnswer`] and then run
//! through [`STAGES`] in order. The first stage that resolves or rejects the
//! answer wins; stages that do not apply pass.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

use crate::error::{ResolveError, Result};
use crate::normalize::{normalize_str, option_text, option_texts, safe_parse, strip_quotes};

/// Shapes a persisted correct answer can take.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredAnswer {
    Index(i64),
    Literal(String),
    Bool(bool),
    ValueList(Vec<Value>),
}

impl StoredAnswer {
    /// Classify a raw persisted answer. Returns `None` when nothing is stored.
    ///
    /// Only genuine JSON numbers count as indices. Text that happens to
    /// decode as a number stays a literal so option texts like `"1990"` can
    /// still match before the numeric-index stage runs.
    pub fn classify(raw: &Value) -> Option<Self> {
        match raw {
            Value::Null => None,
            Value::Bool(flag) => Some(Self::Bool(*flag)),
            Value::Number(number) => Some(match number.as_i64() {
                Some(index) => Self::Index(index),
                None => match number.as_f64() {
                    Some(float) if float.fract() == 0.0 && float.abs() < i64::MAX as f64 => {
                        Self::Index(float as i64)
                    }
                    _ => Self::Literal(number.to_string()),
                },
            }),
            Value::Array(items) => Some(Self::ValueList(items.clone())),
            Value::Object(_) => Some(Self::Literal(option_text(raw))),
            Value::String(text) if text.trim().is_empty() => None,
            Value::String(text) => match safe_parse(raw).value {
                Value::Null => None,
                Value::Bool(flag) => Some(Self::Bool(flag)),
                Value::Array(items) => Some(Self::ValueList(items)),
                Value::String(inner) if inner.trim().is_empty() => None,
                Value::String(inner) => Some(Self::Literal(inner)),
                decoded @ Value::Object(_) => Some(Self::Literal(option_text(&decoded))),
                _ => Some(Self::Literal(text.trim().to_string())),
            },
        }
    }
}

/// A stored answer resolved to a concrete option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedOption {
    pub index: usize,
    pub text: String,
}

/// Result of running one resolver stage.
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome {
    Resolved(ResolvedOption),
    Rejected(ResolveError),
    Pass,
}

pub type Stage = fn(&[String], &StoredAnswer) -> StageOutcome;

/// Resolver stages in priority order.
pub const STAGES: &[(&str, Stage)] = &[
    ("single_value", by_single_value),
    ("index", by_index),
    ("boolean", by_boolean),
    ("literal", by_literal),
    ("numeric_index", by_numeric_index),
    ("unquoted", by_unquoted),
];

/// Resolve a stored correct answer to `{index, text}` within `options`.
pub fn resolve_option_text(options: &[Value], stored: &Value) -> Result<ResolvedOption> {
    if options.is_empty() {
        return Err(ResolveError::NoOptions);
    }
    let answer = StoredAnswer::classify(stored).ok_or(ResolveError::MissingAnswer)?;
    resolve_stored(&option_texts(options), &answer)
}

/// Run the stage chain over pre-extracted option texts.
pub fn resolve_stored(texts: &[String], answer: &StoredAnswer) -> Result<ResolvedOption> {
    for (name, stage) in STAGES {
        match stage(texts, answer) {
            StageOutcome::Resolved(resolved) => {
                trace!(stage = name, index = resolved.index, "stored answer resolved");
                return Ok(resolved);
            }
            StageOutcome::Rejected(error) => {
                trace!(stage = name, %error, "stored answer rejected");
                return Err(error);
            }
            StageOutcome::Pass => {}
        }
    }
    Err(unresolved(texts.len(), answer))
}

fn resolved_at(texts: &[String], index: i64) -> Option<ResolvedOption> {
    let position = usize::try_from(index).ok()?;
    texts.get(position).map(|text| ResolvedOption {
        index: position,
        text: text.clone(),
    })
}

fn parse_index(text: &str) -> Option<i64> {
    text.trim().parse::<i64>().ok()
}

/// Error reported when every stage passed.
fn unresolved(len: usize, answer: &StoredAnswer) -> ResolveError {
    let value = match answer {
        StoredAnswer::Literal(text) => text.clone(),
        StoredAnswer::Bool(flag) => flag.to_string(),
        StoredAnswer::Index(index) => index.to_string(),
        StoredAnswer::ValueList(items) => Value::Array(items.clone()).to_string(),
    };
    let bare = strip_quotes(&value).unwrap_or(&value);
    match parse_index(bare) {
        Some(index) => ResolveError::IndexOutOfRange { index, len },
        None => ResolveError::NoMatch { value },
    }
}

pub fn by_single_value(texts: &[String], answer: &StoredAnswer) -> StageOutcome {
    let StoredAnswer::ValueList(items) = answer else {
        return StageOutcome::Pass;
    };
    match items.as_slice() {
        [] => StageOutcome::Rejected(ResolveError::MissingAnswer),
        [only] => match StoredAnswer::classify(only) {
            Some(inner) => match resolve_stored(texts, &inner) {
                Ok(resolved) => StageOutcome::Resolved(resolved),
                Err(error) => StageOutcome::Rejected(error),
            },
            None => StageOutcome::Rejected(ResolveError::MissingAnswer),
        },
        many => StageOutcome::Rejected(ResolveError::AmbiguousAnswer { count: many.len() }),
    }
}

pub fn by_index(texts: &[String], answer: &StoredAnswer) -> StageOutcome {
    let StoredAnswer::Index(index) = answer else {
        return StageOutcome::Pass;
    };
    match resolved_at(texts, *index) {
        Some(resolved) => StageOutcome::Resolved(resolved),
        None => StageOutcome::Rejected(ResolveError::IndexOutOfRange {
            index: *index,
            len: texts.len(),
        }),
    }
}

/// Booleans match a literal "true"/"false" option first, then fall back to
/// the positional `[True, False]` convention.
pub fn by_boolean(texts: &[String], answer: &StoredAnswer) -> StageOutcome {
    let StoredAnswer::Bool(flag) = answer else {
        return StageOutcome::Pass;
    };
    let wanted = if *flag { "true" } else { "false" };
    if let Some(index) = texts.iter().position(|text| normalize_str(text) == wanted) {
        return StageOutcome::Resolved(ResolvedOption {
            index,
            text: texts[index].clone(),
        });
    }
    let positional = if *flag { 0 } else { 1 };
    match resolved_at(texts, positional) {
        Some(resolved) => StageOutcome::Resolved(resolved),
        None => StageOutcome::Rejected(ResolveError::IndexOutOfRange {
            index: positional,
            len: texts.len(),
        }),
    }
}

pub fn by_literal(texts: &[String], answer: &StoredAnswer) -> StageOutcome {
    let StoredAnswer::Literal(value) = answer else {
        return StageOutcome::Pass;
    };
    let wanted = normalize_str(value);
    match texts.iter().position(|text| normalize_str(text) == wanted) {
        Some(index) => StageOutcome::Resolved(ResolvedOption {
            index,
            text: texts[index].clone(),
        }),
        None => StageOutcome::Pass,
    }
}

pub fn by_numeric_index(texts: &[String], answer: &StoredAnswer) -> StageOutcome {
    let StoredAnswer::Literal(value) = answer else {
        return StageOutcome::Pass;
    };
    match parse_index(value).and_then(|index| resolved_at(texts, index)) {
        Some(resolved) => StageOutcome::Resolved(resolved),
        None => StageOutcome::Pass,
    }
}

/// Retry the literal and numeric stages with one layer of quotes removed.
pub fn by_unquoted(texts: &[String], answer: &StoredAnswer) -> StageOutcome {
    let StoredAnswer::Literal(value) = answer else {
        return StageOutcome::Pass;
    };
    let Some(inner) = strip_quotes(value) else {
        return StageOutcome::Pass;
    };
    let bare = StoredAnswer::Literal(inner.to_string());
    match by_literal(texts, &bare) {
        StageOutcome::Pass => by_numeric_index(texts, &bare),
        outcome => outcome,
    }
}
