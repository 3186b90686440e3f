//! Error types for learning-core.

use thiserror::Error;

/// Result type alias using ResolveError.
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Stored question data that cannot be resolved to a definite correct answer.
///
/// These are data-integrity faults in the content, never a verdict on the
/// learner's submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("stored index {index} is out of range for {len} options")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("stored answer {value:?} matches no option")]
    NoMatch { value: String },

    #[error("question has no options")]
    NoOptions,

    #[error("question has no stored answer")]
    MissingAnswer,

    #[error("stored answer lists {count} values for a single-choice question")]
    AmbiguousAnswer { count: usize },

    #[error("stored ordering answer is not a list")]
    InvalidOrderingAnswer,

    #[error("question has no answer mapping")]
    MissingAnswerMap,

    #[error("step {step} cannot be resolved: {source}")]
    InvalidStep {
        step: usize,
        #[source]
        source: Box<ResolveError>,
    },
}

impl ResolveError {
    /// Machine-readable reason code reported in `ScoreResult::reason`.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::IndexOutOfRange { .. } => "index_out_of_range",
            Self::NoMatch { .. } => "no_match",
            Self::NoOptions => "no_options",
            Self::MissingAnswer => "missing_answer",
            Self::AmbiguousAnswer { .. } => "ambiguous_answer",
            Self::InvalidOrderingAnswer => "invalid_ordering_answer",
            Self::MissingAnswerMap => "missing_answer_map",
            Self::InvalidStep { .. } => "invalid_steps",
        }
    }
}

/// Errors raised while loading engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed configuration: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid value for {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}
