//! SM-2 spaced repetition algorithm.
//!
//! Based on SuperMemo 2 with configurable parameters. Intervals are whole
//! days and the interval growth rounds half away from zero, so a schedule
//! replayed from the same inputs lands on the same due dates.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Quality, ReviewItem, ScoreResult};

/// SM-2 algorithm with configurable parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sm2 {
    pub initial_ease: f64,
    pub minimum_ease: f64,
    pub first_interval: u32,
    pub second_interval: u32,
    /// Lowest quality that counts as a successful recall.
    pub passing_quality: u8,
}

impl Default for Sm2 {
    fn default() -> Self {
        Self {
            initial_ease: 2.5,
            minimum_ease: 1.3,
            first_interval: 1,
            second_interval: 6,
            passing_quality: 3,
        }
    }
}

/// Scheduling state after one review.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sm2Outcome {
    pub ease_factor: f64,
    pub interval: u32,
    pub repetitions: u32,
}

impl Sm2 {
    /// Apply one review to `(repetitions, ease_factor, interval)`.
    pub fn calculate(&self, quality: Quality, repetitions: u32, ease_factor: f64, interval: u32) -> Sm2Outcome {
        let q = quality.value();

        let (new_interval, new_repetitions) = if q >= self.passing_quality {
            let grown = match repetitions {
                0 => self.first_interval,
                1 => self.second_interval,
                _ => (f64::from(interval) * ease_factor).round() as u32,
            };
            (grown.max(1), repetitions.saturating_add(1))
        } else {
            (self.first_interval.max(1), 0)
        };

        // EF' = EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02))
        let lapse = f64::from(5u8.saturating_sub(q));
        let new_ease = (ease_factor + (0.1 - lapse * (0.08 + lapse * 0.02))).max(self.minimum_ease);

        Sm2Outcome {
            ease_factor: new_ease,
            interval: new_interval,
            repetitions: new_repetitions,
        }
    }

    /// Fresh review record, due immediately.
    pub fn initial_review_item(&self, user_id: i64, question_id: i64, now: DateTime<Utc>) -> ReviewItem {
        ReviewItem {
            user_id,
            question_id,
            due_date: now,
            ease_factor: self.initial_ease,
            interval: self.first_interval.max(1),
            repetitions: 0,
            last_reviewed: None,
        }
    }

    /// Next state of an existing review record.
    pub fn schedule(&self, item: &ReviewItem, quality: Quality, now: DateTime<Utc>) -> ReviewItem {
        let outcome = self.calculate(quality, item.repetitions, item.ease_factor, item.interval);
        ReviewItem {
            user_id: item.user_id,
            question_id: item.question_id,
            due_date: now + Duration::days(i64::from(outcome.interval)),
            ease_factor: outcome.ease_factor,
            interval: outcome.interval,
            repetitions: outcome.repetitions,
            last_reviewed: Some(now),
        }
    }

    /// Upsert for a missed question: create the record on the first miss,
    /// otherwise reschedule the existing one.
    pub fn record_incorrect_attempt(
        &self,
        existing: Option<&ReviewItem>,
        user_id: i64,
        question_id: i64,
        quality: Quality,
        now: DateTime<Utc>,
    ) -> ReviewItem {
        match existing {
            Some(item) => self.schedule(item, quality, now),
            None => self.schedule(&self.initial_review_item(user_id, question_id, now), quality, now),
        }
    }

    /// Review record to persist after a scored attempt, if any.
    ///
    /// Unscoreable results never touch the schedule. A miss creates or
    /// resets the record; a correct answer only advances an existing one.
    pub fn after_score(
        &self,
        existing: Option<&ReviewItem>,
        user_id: i64,
        question_id: i64,
        result: &ScoreResult,
        now: DateTime<Utc>,
    ) -> Option<ReviewItem> {
        if !result.ok {
            return None;
        }
        let quality = Quality::from_score(result.is_correct);
        if result.is_correct {
            existing.map(|item| self.schedule(item, quality, now))
        } else {
            Some(self.record_incorrect_attempt(existing, user_id, question_id, quality, now))
        }
    }
}

/// SM-2 transition with the default parameters. Quality above 5 is clamped.
pub fn calculate_sm2(quality: u8, repetitions: u32, ease_factor: f64, interval: u32) -> Sm2Outcome {
    Sm2::default().calculate(Quality::new(quality), repetitions, ease_factor, interval)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn first_two_intervals_are_fixed() {
        let first = calculate_sm2(4, 0, 2.5, 1);
        assert_eq!(first.interval, 1);
        assert_eq!(first.repetitions, 1);

        let second = calculate_sm2(4, 1, 2.5, 1);
        assert_eq!(second.interval, 6);
        assert_eq!(second.repetitions, 2);
    }

    #[test]
    fn interval_grows_by_incoming_ease() {
        let third = calculate_sm2(5, 2, 2.5, 6);
        assert_eq!(third.interval, 15);
        assert_eq!(third.repetitions, 3);
        assert!((third.ease_factor - 2.6).abs() < 1e-12);
    }

    #[test]
    fn deserialized_quality_out_of_range_schedules_as_perfect() {
        let quality: Quality = serde_json::from_value(json!(9)).unwrap();
        let outcome = Sm2::default().calculate(quality, 2, 2.5, 6);
        assert_eq!(outcome, Sm2::default().calculate(Quality::PERFECT, 2, 2.5, 6));
        assert_eq!(outcome.interval, 15);
    }

    #[test]
    fn perfect_recall_sequence_at_initial_ease() {
        let (mut repetitions, mut interval) = (0, 1);
        let mut intervals = Vec::new();
        for _ in 0..5 {
            let outcome = calculate_sm2(5, repetitions, 2.5, interval);
            repetitions = outcome.repetitions;
            interval = outcome.interval;
            intervals.push(interval);
        }
        assert_eq!(intervals, vec![1, 6, 15, 38, 95]);
    }

    #[test]
    fn ease_rises_with_each_perfect_recall() {
        let mut ease = 2.5;
        for step in 1..=5 {
            ease = calculate_sm2(5, 3, ease, 10).ease_factor;
            assert!((ease - (2.5 + 0.1 * step as f64)).abs() < 1e-9);
        }
    }

    #[test]
    fn blackout_resets_progress() {
        let outcome = calculate_sm2(0, 7, 2.8, 120);
        assert_eq!(outcome.repetitions, 0);
        assert_eq!(outcome.interval, 1);
        assert!((outcome.ease_factor - 2.0).abs() < 1e-12);
    }

    #[test]
    fn ease_factor_never_below_minimum() {
        let mut ease = 1.4;
        for _ in 0..10 {
            ease = calculate_sm2(0, 0, ease, 1).ease_factor;
            assert!(ease >= 1.3);
        }
        assert_eq!(ease, 1.3);
        assert_eq!(calculate_sm2(3, 0, f64::NAN, 1).ease_factor, 1.3);
    }

    #[test]
    fn degenerate_state_still_yields_valid_interval() {
        let outcome = calculate_sm2(4, 5, 2.5, 0);
        assert_eq!(outcome.interval, 1);
    }

    #[test]
    fn schedule_sets_due_date() {
        let sm2 = Sm2::default();
        let item = sm2.initial_review_item(1, 42, now());
        let next = sm2.schedule(&item, Quality::new(4), now());
        assert_eq!(next.interval, 1);
        assert_eq!(next.due_date, now() + Duration::days(1));
        assert_eq!(next.last_reviewed, Some(now()));
    }

    #[test]
    fn repeated_misses_update_the_same_record() {
        let sm2 = Sm2::default();
        let first = sm2.record_incorrect_attempt(None, 1, 42, Quality::new(1), now());
        assert_eq!((first.user_id, first.question_id), (1, 42));
        assert_eq!(first.repetitions, 0);

        let progressed = ReviewItem {
            repetitions: 4,
            interval: 30,
            ..first.clone()
        };
        let second = sm2.record_incorrect_attempt(Some(&progressed), 1, 42, Quality::new(1), now());
        assert_eq!(second.repetitions, 0);
        assert_eq!(second.interval, 1);
        assert!(second.ease_factor < first.ease_factor);
    }

    #[test]
    fn after_score_follows_upsert_rules() {
        let sm2 = Sm2::default();
        let wrong = ScoreResult::graded(false, json!("A"));
        let right = ScoreResult::graded(true, json!("A"));
        let broken = ScoreResult::unscoreable(&crate::error::ResolveError::NoOptions);

        assert!(sm2.after_score(None, 1, 2, &broken, now()).is_none());
        assert!(sm2.after_score(None, 1, 2, &right, now()).is_none());

        let created = sm2.after_score(None, 1, 2, &wrong, now()).unwrap();
        let advanced = sm2.after_score(Some(&created), 1, 2, &right, now()).unwrap();
        assert_eq!(advanced.repetitions, 1);
    }
}
