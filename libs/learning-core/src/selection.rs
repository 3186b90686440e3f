//! Adaptive question selection.
//!
//! Ranks a topic's question pool for one learner. Weights are tuned so that
//! unseen material dominates, then questions the learner keeps missing, then
//! recency avoidance, then fit to the learner's current difficulty.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{AttemptRecord, PerQuestionStat, Question};

/// Penalty applied when the last attempt is younger than `within_hours`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecencyBucket {
    pub within_hours: f64,
    pub penalty: i64,
}

/// Tunable selection constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub history_window: usize,
    /// Samples needed before accuracy shifts the target difficulty.
    pub min_samples: usize,
    pub high_accuracy: f64,
    pub low_accuracy: f64,
    pub default_difficulty: u8,
    pub min_difficulty: u8,
    pub max_difficulty: u8,
    pub unseen_bonus: i64,
    pub wrong_weight: i64,
    pub correct_weight: i64,
    /// Checked in order; the first bucket that applies wins.
    pub recency_buckets: Vec<RecencyBucket>,
    pub difficulty_weight: i64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            history_window: 30,
            min_samples: 5,
            high_accuracy: 0.8,
            low_accuracy: 0.5,
            default_difficulty: 3,
            min_difficulty: 1,
            max_difficulty: 5,
            unseen_bonus: 1000,
            wrong_weight: 120,
            correct_weight: 15,
            recency_buckets: vec![
                RecencyBucket { within_hours: 6.0, penalty: -300 },
                RecencyBucket { within_hours: 24.0, penalty: -150 },
                RecencyBucket { within_hours: 72.0, penalty: -60 },
                RecencyBucket { within_hours: 168.0, penalty: -15 },
            ],
            difficulty_weight: 10,
        }
    }
}

/// Inputs for one selection.
#[derive(Debug, Clone, Copy)]
pub struct SelectionRequest<'a> {
    pub question_pool: &'a [Question],
    pub per_question_stats: &'a [PerQuestionStat],
    pub recent_attempts: &'a [AttemptRecord],
    pub limit: usize,
    pub now: DateTime<Utc>,
}

/// Learner's rolling difficulty target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyTarget {
    pub target_difficulty: u8,
    pub recent_accuracy: f64,
    pub samples: usize,
}

/// Score components for one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub novelty: i64,
    pub reinforcement: i64,
    pub recency: i64,
    pub difficulty_fit: i64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> i64 {
        self.novelty + self.reinforcement + self.recency + self.difficulty_fit
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedQuestion<'a> {
    pub question: &'a Question,
    pub score: ScoreBreakdown,
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectionResult<'a> {
    pub questions: Vec<RankedQuestion<'a>>,
    pub target_difficulty: u8,
    pub recent_accuracy: f64,
    pub samples: usize,
}

/// Chooses the next batch of questions.
#[derive(Debug, Clone, Default)]
pub struct AdaptiveSelector {
    config: SelectionConfig,
}

impl AdaptiveSelector {
    pub fn new(config: SelectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// Target difficulty from the most recent attempts.
    pub fn target_difficulty(&self, attempts: &[AttemptRecord]) -> DifficultyTarget {
        let config = &self.config;
        let mut recent: Vec<&AttemptRecord> = attempts.iter().collect();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(config.history_window);

        let samples = recent.len();
        if samples == 0 {
            return DifficultyTarget {
                target_difficulty: config.default_difficulty,
                recent_accuracy: 0.0,
                samples,
            };
        }

        let correct = recent.iter().filter(|attempt| attempt.is_correct).count();
        let recent_accuracy = correct as f64 / samples as f64;
        let total: f64 = recent.iter().map(|attempt| f64::from(attempt.difficulty)).sum();
        let mut target = (total / samples as f64).round() as i64;

        if samples >= config.min_samples {
            if recent_accuracy >= config.high_accuracy {
                target += 1;
            } else if recent_accuracy <= config.low_accuracy {
                target -= 1;
            }
        }
        let target = target.clamp(i64::from(config.min_difficulty), i64::from(config.max_difficulty));

        DifficultyTarget {
            target_difficulty: target as u8,
            recent_accuracy,
            samples,
        }
    }

    /// Score one candidate against the learner's stats.
    pub fn score_question(
        &self,
        question: &Question,
        stat: Option<&PerQuestionStat>,
        target_difficulty: u8,
        now: DateTime<Utc>,
    ) -> ScoreBreakdown {
        let config = &self.config;
        let mut breakdown = ScoreBreakdown::default();

        match stat.filter(|stat| stat.attempts > 0) {
            None => breakdown.novelty = config.unseen_bonus,
            Some(stat) => {
                breakdown.reinforcement = config.wrong_weight * i64::from(stat.wrong())
                    - config.correct_weight * i64::from(stat.correct)
            }
        }

        if let Some(last) = stat.and_then(|stat| stat.last_attempt_at) {
            breakdown.recency = self.recency_penalty(last, now);
        }

        let distance = (i64::from(question.difficulty) - i64::from(target_difficulty)).abs();
        breakdown.difficulty_fit = -config.difficulty_weight * distance;

        breakdown
    }

    fn recency_penalty(&self, last: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
        // Future timestamps count as just attempted.
        let hours = ((now - last).num_milliseconds() as f64 / 3_600_000.0).max(0.0);
        self.config
            .recency_buckets
            .iter()
            .find(|bucket| hours < bucket.within_hours)
            .map(|bucket| bucket.penalty)
            .unwrap_or(0)
    }

    /// Rank the pool and return the top `limit` questions.
    pub fn select<'a>(&self, request: SelectionRequest<'a>) -> SelectionResult<'a> {
        let target = self.target_difficulty(request.recent_attempts);
        let stats: HashMap<i64, &PerQuestionStat> = request
            .per_question_stats
            .iter()
            .map(|stat| (stat.question_id, stat))
            .collect();

        let mut ranked: Vec<RankedQuestion<'a>> = request
            .question_pool
            .iter()
            .map(|question| RankedQuestion {
                question,
                score: self.score_question(
                    question,
                    stats.get(&question.id).copied(),
                    target.target_difficulty,
                    request.now,
                ),
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.score
                .total()
                .cmp(&a.score.total())
                .then_with(|| b.question.created_at.cmp(&a.question.created_at))
                .then_with(|| b.question.id.cmp(&a.question.id))
        });
        ranked.truncate(request.limit);

        debug!(
            pool = request.question_pool.len(),
            selected = ranked.len(),
            target_difficulty = target.target_difficulty,
            recent_accuracy = target.recent_accuracy,
            samples = target.samples,
            "adaptive batch selected"
        );

        SelectionResult {
            questions: ranked,
            target_difficulty: target.target_difficulty,
            recent_accuracy: target.recent_accuracy,
            samples: target.samples,
        }
    }
}

/// Select a batch with the default configuration.
pub fn select_adaptive_batch(request: SelectionRequest<'_>) -> SelectionResult<'_> {
    AdaptiveSelector::default().select(request)
}
