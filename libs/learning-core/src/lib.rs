//! Answer scoring and adaptive learning engine.
//!
//! Provides:
//! - Normalization of inconsistently encoded persisted answers
//! - Per-modality answer scoring (choice, ordering, slider, image label,
//!   multi-step, free text)
//! - SM-2 spaced repetition scheduling
//! - Adaptive question selection
//!
//! Everything here is a pure function over caller-supplied data. Persistence,
//! HTTP and authentication belong to the host application.

pub mod algorithm;
pub mod config;
pub mod error;
pub mod normalize;
pub mod resolve;
pub mod scoring;
pub mod selection;
pub mod types;

pub use algorithm::{calculate_sm2, Sm2, Sm2Outcome};
pub use config::EngineConfig;
pub use error::{ConfigError, ResolveError, Result};
pub use normalize::{normalize_text, safe_parse, SafeParsed};
pub use resolve::{resolve_option_text, ResolvedOption, StoredAnswer};
pub use scoring::{score_question_answer, AnswerScorer, ScoringConfig};
pub use selection::{
    select_adaptive_batch, AdaptiveSelector, DifficultyTarget, RankedQuestion, RecencyBucket,
    ScoreBreakdown, SelectionConfig, SelectionRequest, SelectionResult,
};
pub use types::{
    AttemptRecord, PerQuestionStat, Quality, Question, QuestionType, ReviewItem, ScoreResult,
};
