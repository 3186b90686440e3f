//! Slider questions: a numeric answer accepted within a tolerance.

use serde_json::{json, Map, Value};

use super::ScoringConfig;
use crate::error::{ResolveError, Result};
use crate::normalize::{is_blank, safe_parse};
use crate::types::{Question, ScoreResult};

/// Slider geometry decoded from the question's options and assets.
#[derive(Debug, Clone, PartialEq)]
pub struct SliderSpec {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: f64,
    pub unit: Option<String>,
    pub tolerance: Option<f64>,
}

impl SliderSpec {
    /// Read `{min, max, step, unit?, tolerance?}` from `options`, with
    /// `assets.tolerance` as a fallback for the tolerance.
    ///
    /// Non-finite bounds are dropped and a missing or non-positive step uses
    /// the configured default.
    pub fn from_question(question: &Question, config: &ScoringConfig) -> Self {
        let options = slider_object(&question.options);
        let assets = slider_object(&question.assets);

        let step = read_number(&options, "step")
            .filter(|step| *step > 0.0)
            .unwrap_or(config.default_slider_step);
        let tolerance = read_number(&options, "tolerance")
            .or_else(|| read_number(&assets, "tolerance"))
            .filter(|tolerance| *tolerance >= 0.0);
        let unit = options
            .get("unit")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|unit| !unit.is_empty())
            .map(str::to_string);

        Self {
            min: read_number(&options, "min"),
            max: read_number(&options, "max"),
            step,
            unit,
            tolerance,
        }
    }

    /// `max(step / 2, configured tolerance, ratio × range)`.
    pub fn tolerance(&self, config: &ScoringConfig) -> f64 {
        let floor = self.step / 2.0;
        let configured = self.tolerance.unwrap_or(0.0);
        let range = match (self.min, self.max) {
            (Some(min), Some(max)) => (max - min).abs() * config.slider_range_tolerance,
            _ => 0.0,
        };
        floor.max(configured).max(range)
    }
}

pub fn score(config: &ScoringConfig, question: &Question, submission: &Value) -> Result<ScoreResult> {
    let stored = safe_parse(&question.answer).value;
    if is_blank(&stored) {
        return Err(ResolveError::MissingAnswer);
    }

    let spec = SliderSpec::from_question(question, config);
    let tolerance = spec.tolerance(config);
    let details = json!({ "tolerance": tolerance, "unit": spec.unit });

    let Some(correct) = parse_number(&stored, spec.unit.as_deref()) else {
        return Ok(ScoreResult::graded(false, stored).with_details(details));
    };
    let is_correct = parse_number(&safe_parse(submission).value, spec.unit.as_deref())
        .map(|value| (value - correct).abs() <= tolerance + config.tolerance_epsilon)
        .unwrap_or(false);

    Ok(ScoreResult::graded(is_correct, json!(correct)).with_details(details))
}

/// Parse a finite number from a JSON number or text, ignoring a trailing unit.
pub fn parse_number(value: &Value, unit: Option<&str>) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => {
            let text = text.trim();
            let text = unit
                .and_then(|unit| text.strip_suffix(unit))
                .unwrap_or(text)
                .trim();
            text.parse::<f64>().ok()
        }
        _ => None,
    };
    number.filter(|number| number.is_finite())
}

fn slider_object(raw: &Value) -> Map<String, Value> {
    match safe_parse(raw).value {
        Value::Object(map) => map,
        Value::Array(items) => items
            .into_iter()
            .find_map(|item| match item {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .unwrap_or_default(),
        _ => Map::new(),
    }
}

fn read_number(map: &Map<String, Value>, key: &str) -> Option<f64> {
    map.get(key)
        .and_then(|value| parse_number(&safe_parse(value).value, None))
}
