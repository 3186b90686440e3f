//! Property-based tests for scoring, scheduling and selection.
//!
//! Invariants covered:
//! - Option questions accept exactly the stored option
//! - Quote-wrapped submissions score like bare ones
//! - Ordering accepts only the exact sequence
//! - SM-2 keeps the ease floor and a valid interval for any input
//! - Unseen questions outrank lightly practised ones at equal difficulty

use proptest::prelude::*;
use serde_json::{json, Value};

use learning_core::{
    calculate_sm2, score_question_answer, select_adaptive_batch, PerQuestionStat, Question,
    QuestionType, SelectionRequest,
};

mod common;

// ============================================================================
// Arbitrary Generators
// ============================================================================

/// Distinct option texts; a numeric suffix keeps them unique after normalization.
fn arb_options() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[A-Za-z]{1,8}", 2..6).prop_map(|words| {
        words
            .into_iter()
            .enumerate()
            .map(|(i, word)| format!("{word} {i}"))
            .collect()
    })
}

fn arb_option_question() -> impl Strategy<Value = (Vec<String>, usize)> {
    arb_options().prop_flat_map(|options| {
        let len = options.len();
        (Just(options), 0..len)
    })
}

fn mcq(options: &[String], answer: Value) -> Question {
    Question::new(1, QuestionType::Mcq, answer).with_options(json!(options))
}

// ============================================================================
// Scoring
// ============================================================================

proptest! {
    #[test]
    fn stored_index_accepts_only_its_option((options, correct) in arb_option_question()) {
        let question = mcq(&options, json!(correct));
        for (i, text) in options.iter().enumerate() {
            let result = score_question_answer(&question, &json!(text));
            prop_assert!(result.ok);
            prop_assert_eq!(result.is_correct, i == correct);
        }
    }

    #[test]
    fn quoted_submission_matches_bare((options, correct) in arb_option_question(), submitted in 0usize..6) {
        let question = mcq(&options, json!(options[correct]));
        let text = &options[submitted % options.len()];
        let bare = score_question_answer(&question, &json!(text));
        let quoted = score_question_answer(&question, &json!(format!("\"{text}\"")));
        prop_assert_eq!(bare, quoted);
    }

    #[test]
    fn ordering_accepts_only_exact_sequence(options in arb_options(), a in 0usize..6, b in 0usize..6) {
        let question = Question::new(2, QuestionType::Ordering, json!((0..options.len()).collect::<Vec<_>>()))
            .with_options(json!(options));

        prop_assert!(score_question_answer(&question, &json!(options)).is_correct);

        let (a, b) = (a % options.len(), b % options.len());
        prop_assume!(a != b);
        let mut swapped = options.clone();
        swapped.swap(a, b);
        let result = score_question_answer(&question, &json!(swapped));
        prop_assert!(result.ok);
        prop_assert!(!result.is_correct);

        let shorter = &options[..options.len() - 1];
        let result = score_question_answer(&question, &json!(shorter));
        prop_assert!(result.ok);
        prop_assert!(!result.is_correct);
    }

    #[test]
    fn image_label_rejects_any_single_change(labels in prop::collection::btree_map("t[0-9]{1,2}", "[a-z]{1,6}", 1..5), pick in 0usize..5) {
        let question = Question::new(3, QuestionType::ImageLabel, json!(labels));
        prop_assert!(score_question_answer(&question, &json!(labels)).is_correct);

        let key = labels.keys().nth(pick % labels.len()).cloned().unwrap();
        let mut changed = labels.clone();
        changed.insert(key, "changed label".to_string());
        prop_assert!(!score_question_answer(&question, &json!(changed)).is_correct);
    }
}

// ============================================================================
// Scheduling
// ============================================================================

proptest! {
    #[test]
    fn sm2_is_total(quality in 0u8..=5, repetitions in 0u32..50, ease in 0.0f64..5.0, interval in 0u32..10_000) {
        let outcome = calculate_sm2(quality, repetitions, ease, interval);
        prop_assert!(outcome.ease_factor >= 1.3);
        prop_assert!(outcome.interval >= 1);
        if quality < 3 {
            prop_assert_eq!(outcome.repetitions, 0);
            prop_assert_eq!(outcome.interval, 1);
        } else {
            prop_assert_eq!(outcome.repetitions, repetitions + 1);
        }
    }
}

// ============================================================================
// Selection
// ============================================================================

proptest! {
    // Eight misses (+960) stay below the unseen bonus (+1000).
    #[test]
    fn unseen_outranks_lightly_practised(attempts in 1u32..=8, correct_share in 0u32..=100, hours_ago in proptest::option::of(0i64..2000)) {
        let correct = attempts * correct_share / 100;
        let pool = vec![
            Question::new(1, QuestionType::ShortAnswer, json!("a")),
            Question::new(2, QuestionType::ShortAnswer, json!("b")),
        ];
        let stats = vec![PerQuestionStat {
            question_id: 2,
            attempts,
            correct,
            last_attempt_at: hours_ago.map(|hours| common::now() - chrono::Duration::hours(hours)),
        }];
        let result = select_adaptive_batch(SelectionRequest {
            question_pool: &pool,
            per_question_stats: &stats,
            recent_attempts: &[],
            limit: 1,
            now: common::now(),
        });
        prop_assert_eq!(result.questions[0].question.id, 1);
    }
}
