//! Spaced repetition scheduling.

pub mod sm2;

pub use sm2::{calculate_sm2, Sm2, Sm2Outcome};
