//! Cognitive overload scoring.
//!
//! A weighted linear combination over one window's aggregated cues,
//! bucketed into a label. Pure and deterministic; weights and thresholds
//! come from configuration so they can be tuned without touching the
//! algorithm.

use serde::{Deserialize, Serialize};

use crate::signals::{Expression, GazeDirection};

/// Weight applied to each behavioral cue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Per blink
    pub blink: f64,
    /// Per yawn
    pub yawn: f64,
    /// Once, if gaze is off center
    pub gaze: f64,
    /// Once, if the dominant expression is not neutral
    pub expression: f64,
    /// Once, if typing is slower than the slow-typing cutoff (negative)
    pub typing_speed: f64,
    /// Per backspace
    pub backspace: f64,
    /// Per detected error
    pub error: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            blink: 1.0,
            yawn: 2.0,
            gaze: 1.0,
            expression: 2.0,
            typing_speed: -1.0,
            backspace: 1.0,
            error: 1.0,
        }
    }
}

/// Tunable scoring configuration: cue weights and label thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreConfig {
    pub weights: ScoreWeights,
    /// Scores below this are Normal
    pub moderate_threshold: f64,
    /// Scores at or above this are Overload
    pub overload_threshold: f64,
    /// Typing slower than this (chars/min) incurs the typing-speed weight
    pub slow_typing_cpm: f64,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            moderate_threshold: 3.0,
            overload_threshold: 6.0,
            slow_typing_cpm: 100.0,
        }
    }
}

/// Overload classification buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OverloadLabel {
    #[default]
    Normal,
    Moderate,
    Overload,
}

impl std::fmt::Display for OverloadLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OverloadLabel::Normal => "Normal",
            OverloadLabel::Moderate => "Moderate",
            OverloadLabel::Overload => "Overload",
        };
        write!(f, "{name}")
    }
}

/// Feature values scored at window close. Missing signals must be
/// defaulted to zero/neutral by the caller before scoring.
#[derive(Debug, Clone, Default)]
pub struct ScoreFeatures {
    pub blink_count: u32,
    pub yawn_count: u32,
    pub gaze_direction: GazeDirection,
    pub current_expression: Expression,
    pub typing_speed: f64,
    pub backspace_count: u32,
    pub error_count: u32,
}

/// Pure scorer over one window's aggregated features.
#[derive(Debug, Clone)]
pub struct ScoreEngine {
    config: ScoreConfig,
}

impl ScoreEngine {
    pub fn new(config: ScoreConfig) -> Self {
        Self { config }
    }

    /// Score one window's features. Deterministic, no side effects.
    pub fn score(&self, features: &ScoreFeatures) -> (f64, OverloadLabel) {
        let w = &self.config.weights;

        let gaze_score = if features.gaze_direction != GazeDirection::Center {
            w.gaze
        } else {
            0.0
        };
        let expression_score = if features.current_expression != Expression::Neutral {
            w.expression
        } else {
            0.0
        };
        let typing_penalty = if features.typing_speed < self.config.slow_typing_cpm {
            w.typing_speed
        } else {
            0.0
        };

        let score = features.blink_count as f64 * w.blink
            + features.yawn_count as f64 * w.yawn
            + gaze_score
            + expression_score
            + features.backspace_count as f64 * w.backspace
            + features.error_count as f64 * w.error
            + typing_penalty;

        (score, self.label(score))
    }

    /// Bucket a score into its label.
    pub fn label(&self, score: f64) -> OverloadLabel {
        if score < self.config.moderate_threshold {
            OverloadLabel::Normal
        } else if score < self.config.overload_threshold {
            OverloadLabel::Moderate
        } else {
            OverloadLabel::Overload
        }
    }
}

impl Default for ScoreEngine {
    fn default() -> Self {
        Self::new(ScoreConfig::default())
    }
}
