//! Core types for the scoring and adaptive learning engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ResolveError;

/// Interaction modality of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    #[serde(alias = "multiple_choice")]
    Mcq,
    TrueFalse,
    Scenario,
    ShortAnswer,
    Ordering,
    Slider,
    ImageLabel,
    MultiStep,
}

impl QuestionType {
    /// Get the type name as stored by the content pipeline.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mcq => "mcq",
            Self::TrueFalse => "true_false",
            Self::Scenario => "scenario",
            Self::ShortAnswer => "short_answer",
            Self::Ordering => "ordering",
            Self::Slider => "slider",
            Self::ImageLabel => "image_label",
            Self::MultiStep => "multi_step",
        }
    }

    /// Parse from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "mcq" | "multiple_choice" => Some(Self::Mcq),
            "true_false" => Some(Self::TrueFalse),
            "scenario" => Some(Self::Scenario),
            "short_answer" => Some(Self::ShortAnswer),
            "ordering" => Some(Self::Ordering),
            "slider" => Some(Self::Slider),
            "image_label" => Some(Self::ImageLabel),
            "multi_step" => Some(Self::MultiStep),
            _ => None,
        }
    }
}

fn default_difficulty() -> u8 {
    3
}

/// A question as persisted by the content subsystem.
///
/// `options`, `answer`, `assets` and `source_meta` are kept as raw JSON:
/// depending on which generator wrote the row they may hold structured
/// values or JSON-encoded text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    #[serde(default)]
    pub options: Value,
    #[serde(default)]
    pub answer: Value,
    #[serde(default)]
    pub assets: Value,
    #[serde(default, alias = "sourceMeta")]
    pub source_meta: Value,
    #[serde(default = "default_difficulty")]
    pub difficulty: u8,
    #[serde(default, alias = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Question {
    /// Create a question with no options or assets.
    pub fn new(id: i64, kind: QuestionType, answer: Value) -> Self {
        Self {
            id,
            kind,
            options: Value::Null,
            answer,
            assets: Value::Null,
            source_meta: Value::Null,
            difficulty: default_difficulty(),
            created_at: None,
        }
    }

    pub fn with_options(mut self, options: Value) -> Self {
        self.options = options;
        self
    }

    pub fn with_assets(mut self, assets: Value) -> Self {
        self.assets = assets;
        self
    }

    pub fn with_difficulty(mut self, difficulty: u8) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }
}

/// A single past attempt, used for the rolling difficulty target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptRecord {
    #[serde(alias = "questionId")]
    pub question_id: i64,
    #[serde(alias = "isCorrect")]
    pub is_correct: bool,
    pub difficulty: u8,
    #[serde(alias = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Aggregate attempt statistics for one user and one question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerQuestionStat {
    #[serde(alias = "questionId")]
    pub question_id: i64,
    pub attempts: u32,
    pub correct: u32,
    #[serde(default, alias = "lastAttemptAt", skip_serializing_if = "Option::is_none")]
    pub last_attempt_at: Option<DateTime<Utc>>,
}

impl PerQuestionStat {
    /// Number of incorrect attempts.
    pub fn wrong(&self) -> u32 {
        self.attempts.saturating_sub(self.correct)
    }
}

/// Spaced-repetition record, one per (user, question) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewItem {
    pub user_id: i64,
    pub question_id: i64,
    pub due_date: DateTime<Utc>,
    pub ease_factor: f64,
    pub interval: u32,
    pub repetitions: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<DateTime<Utc>>,
}

/// Recall quality on the SM-2 0-5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct Quality(u8);

impl Quality {
    pub const BLACKOUT: Self = Self(0);
    pub const PERFECT: Self = Self(5);

    /// Create a quality rating, clamping values above 5.
    pub fn new(value: u8) -> Self {
        Self(value.min(5))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Conventional rating for a scored attempt: 4 when correct, 1 when missed.
    pub fn from_score(is_correct: bool) -> Self {
        if is_correct { Self(4) } else { Self(1) }
    }
}

impl From<u8> for Quality {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

impl From<Quality> for u8 {
    fn from(quality: Quality) -> Self {
        quality.0
    }
}

/// Outcome of scoring one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    /// False when the stored question data could not be resolved.
    pub ok: bool,
    #[serde(alias = "is_correct")]
    pub is_correct: bool,
    #[serde(alias = "correct_answer")]
    pub correct_answer: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ScoreResult {
    /// A definite verdict on the learner's submission.
    pub fn graded(is_correct: bool, correct_answer: Value) -> Self {
        Self {
            ok: true,
            is_correct,
            correct_answer,
            reason: None,
            details: None,
        }
    }

    /// The stored question data could not be resolved.
    pub fn unscoreable(error: &ResolveError) -> Self {
        Self {
            ok: false,
            is_correct: false,
            correct_answer: Value::Null,
            reason: Some(error.reason().to_string()),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}
