//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::algorithm::Sm2;
use crate::error::ConfigError;
use crate::scoring::{AnswerScorer, ScoringConfig};
use crate::selection::{AdaptiveSelector, SelectionConfig};

/// All tunable constants of the engine.
///
/// Every section defaults independently, so a partial document overrides
/// only the fields it names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub scoring: ScoringConfig,
    pub scheduler: Sm2,
    pub selection: SelectionConfig,
}

impl EngineConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let scoring = &self.scoring;
        if !(scoring.default_slider_step.is_finite() && scoring.default_slider_step > 0.0) {
            return Err(invalid("scoring.default_slider_step", "must be a positive number"));
        }
        if !(scoring.slider_range_tolerance.is_finite() && scoring.slider_range_tolerance >= 0.0) {
            return Err(invalid("scoring.slider_range_tolerance", "must be a non-negative number"));
        }
        if !(scoring.tolerance_epsilon.is_finite() && scoring.tolerance_epsilon >= 0.0) {
            return Err(invalid("scoring.tolerance_epsilon", "must be a non-negative number"));
        }

        let scheduler = &self.scheduler;
        if !(scheduler.minimum_ease.is_finite() && scheduler.minimum_ease > 0.0) {
            return Err(invalid("scheduler.minimum_ease", "must be a positive number"));
        }
        if !(scheduler.initial_ease.is_finite() && scheduler.initial_ease >= scheduler.minimum_ease) {
            return Err(invalid("scheduler.initial_ease", "must not be below minimum_ease"));
        }
        if scheduler.first_interval == 0 || scheduler.second_interval == 0 {
            return Err(invalid("scheduler.first_interval", "intervals must be at least one day"));
        }
        if scheduler.passing_quality > 5 {
            return Err(invalid("scheduler.passing_quality", "must be within 0..=5"));
        }

        let selection = &self.selection;
        if selection.history_window == 0 {
            return Err(invalid("selection.history_window", "must be at least 1"));
        }
        if selection.min_difficulty > selection.max_difficulty {
            return Err(invalid("selection.min_difficulty", "must not exceed max_difficulty"));
        }
        if !(selection.min_difficulty..=selection.max_difficulty).contains(&selection.default_difficulty) {
            return Err(invalid("selection.default_difficulty", "must lie within the difficulty range"));
        }
        let ascending = selection
            .recency_buckets
            .windows(2)
            .all(|pair| pair[0].within_hours < pair[1].within_hours);
        if !ascending {
            return Err(invalid("selection.recency_buckets", "must be sorted by ascending hours"));
        }

        Ok(())
    }

    pub fn scorer(&self) -> AnswerScorer {
        AnswerScorer::new(self.scoring.clone())
    }

    pub fn selector(&self) -> AdaptiveSelector {
        AdaptiveSelector::new(self.selection.clone())
    }
}

fn invalid(field: &'static str, message: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let config = EngineConfig::from_json(
            r#"{"scheduler": {"minimum_ease": 1.5}, "selection": {"unseen_bonus": 500}}"#,
        )
        .unwrap();
        assert_eq!(config.scheduler.minimum_ease, 1.5);
        assert_eq!(config.scheduler.initial_ease, 2.5);
        assert_eq!(config.selection.unseen_bonus, 500);
        assert_eq!(config.selection.recency_buckets.len(), 4);
        assert_eq!(config.scoring, ScoringConfig::default());
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(
            EngineConfig::from_json("{not json"),
            Err(ConfigError::Malformed(_))
        ));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let cases = [
            r#"{"scheduler": {"minimum_ease": 0}}"#,
            r#"{"scheduler": {"initial_ease": 1.0}}"#,
            r#"{"selection": {"history_window": 0}}"#,
            r#"{"selection": {"min_difficulty": 4, "max_difficulty": 2}}"#,
            r#"{"selection": {"recency_buckets": [{"within_hours": 24, "penalty": -1}, {"within_hours": 6, "penalty": -2}]}}"#,
            r#"{"scoring": {"default_slider_step": 0}}"#,
        ];
        for case in cases {
            assert!(
                matches!(EngineConfig::from_json(case), Err(ConfigError::Invalid { .. })),
                "accepted {case}"
            );
        }
    }

    #[test]
    fn builds_components() {
        let mut config = EngineConfig::default();
        config.selection.unseen_bonus = 10;
        assert_eq!(config.selector().config().unseen_bonus, 10);
        assert_eq!(config.scorer().config(), &ScoringConfig::default());
    }
}
