//! Per-modality correctness scoring.
//!
//! [`AnswerScorer::score`] dispatches on [`QuestionType`] with an exhaustive
//! match. Scorers return `Err(ResolveError)` for stored-data faults, which
//! surface as `ok: false` results; a learner's mismatch is `ok: true,
//! is_correct: false`.

pub mod choice;
pub mod image_label;
pub mod multi_step;
pub mod ordering;
pub mod slider;
pub mod text;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use crate::error::{ResolveError, Result};
use crate::normalize::extract_options;
use crate::types::{Question, QuestionType, ScoreResult};

/// Tunable scoring constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Share of a slider's range accepted as tolerance.
    pub slider_range_tolerance: f64,
    /// Step assumed when a slider's step is missing or invalid.
    pub default_slider_step: f64,
    /// Slack added to slider comparisons to absorb float error at the boundary.
    pub tolerance_epsilon: f64,
    /// Submission older clients send for a finished multi-step question.
    pub completed_sentinel: String,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            slider_range_tolerance: 0.02,
            default_slider_step: 1.0,
            tolerance_epsilon: 1e-9,
            completed_sentinel: "Completed".to_string(),
        }
    }
}

/// Scores learner submissions against stored questions.
#[derive(Debug, Clone, Default)]
pub struct AnswerScorer {
    config: ScoringConfig,
}

impl AnswerScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score one submission. Never fails: unresolvable stored data yields
    /// `ok: false` with a machine-readable reason.
    pub fn score(&self, question: &Question, user_answer: &Value) -> ScoreResult {
        match self.dispatch(question, user_answer) {
            Ok(result) => result,
            Err(error) => {
                warn!(
                    question_id = question.id,
                    question_type = question.kind.as_str(),
                    reason = error.reason(),
                    %error,
                    "stored question data cannot be scored"
                );
                let result = ScoreResult::unscoreable(&error);
                match error {
                    ResolveError::InvalidStep { step, .. } => result.with_details(json!({ "step": step })),
                    _ => result,
                }
            }
        }
    }

    fn dispatch(&self, question: &Question, user_answer: &Value) -> Result<ScoreResult> {
        let options = extract_options(&question.options);
        let answer = &question.answer;

        match question.kind {
            QuestionType::Mcq => choice::score(&options, answer, user_answer),
            QuestionType::TrueFalse => {
                if options.is_empty() {
                    choice::score(&choice::implicit_true_false(), answer, user_answer)
                } else {
                    choice::score(&options, answer, user_answer)
                }
            }
            QuestionType::Scenario => {
                if options.is_empty() {
                    text::score(answer, user_answer)
                } else {
                    choice::score(&options, answer, user_answer)
                }
            }
            QuestionType::ShortAnswer => text::score(answer, user_answer),
            QuestionType::Ordering => ordering::score(&options, answer, user_answer),
            QuestionType::Slider => slider::score(&self.config, question, user_answer),
            QuestionType::ImageLabel => image_label::score(answer, &question.assets, user_answer),
            QuestionType::MultiStep => match multi_step::scaffold_steps(&question.assets) {
                Some(steps) => multi_step::score(&self.config, answer, &steps, user_answer),
                None if !options.is_empty() => choice::score(&options, answer, user_answer),
                None => text::score(answer, user_answer),
            },
        }
    }
}

/// Score a submission with the default configuration.
pub fn score_question_answer(question: &Question, user_answer: &Value) -> ScoreResult {
    AnswerScorer::default().score(question, user_answer)
}
