//! Shared fixtures for integration tests.
//!
//! Question rows are built from JSON the way the content store hands them
//! over, including the legacy encodings older generators produced.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};

use learning_core::{AttemptRecord, PerQuestionStat, Question};

/// Fixed clock for deterministic scheduling and recency.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 2, 8, 30, 0).unwrap()
}

/// Deserialize a question row.
pub fn question_row(row: Value) -> Question {
    serde_json::from_value(row).expect("fixture row should deserialize")
}

/// An mcq row whose options are JSON-encoded text.
pub fn legacy_mcq(id: i64, options: &[&str], answer: Value) -> Question {
    let encoded = serde_json::to_string(options).expect("options encode");
    question_row(json!({
        "id": id,
        "type": "mcq",
        "options": encoded,
        "answer": answer,
        "difficulty": 2
    }))
}

/// Question of the given difficulty created `days_ago` days before [`now`].
pub fn pool_question(id: i64, difficulty: u8, days_ago: i64) -> Question {
    question_row(json!({
        "id": id,
        "type": "short_answer",
        "answer": format!("answer {id}"),
        "difficulty": difficulty,
        "createdAt": (now() - Duration::days(days_ago)).to_rfc3339()
    }))
}

pub fn stat(question_id: i64, attempts: u32, correct: u32, hours_ago: Option<i64>) -> PerQuestionStat {
    PerQuestionStat {
        question_id,
        attempts,
        correct,
        last_attempt_at: hours_ago.map(|hours| now() - Duration::hours(hours)),
    }
}

/// `count` attempts at `difficulty`, the first `correct` of them right.
pub fn attempts(count: usize, correct: usize, difficulty: u8) -> Vec<AttemptRecord> {
    (0..count)
        .map(|i| AttemptRecord {
            question_id: i as i64 + 1,
            is_correct: i < correct,
            difficulty,
            created_at: now() - Duration::minutes(i as i64 * 5),
        })
        .collect()
}
